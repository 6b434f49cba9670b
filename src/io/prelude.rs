pub use super::{FileOpen, FromLine, Read};
