use chrono::{DateTime, Duration, Local};

pub type Timestamp = DateTime<Local>;

pub fn now() -> Timestamp {
    Local::now()
}

/// Current time, but never earlier than `prev`
pub fn not_before(prev: Timestamp) -> Timestamp {
    now().max(prev)
}

/// Current time, but strictly later than `prev`
pub fn after(prev: Timestamp) -> Timestamp {
    let t = now();
    if t > prev {
        t
    } else {
        prev + Duration::microseconds(1)
    }
}
