mod record;

pub use record::EditorRecord;
