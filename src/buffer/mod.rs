mod rope;

pub use rope::Buffer;
