//! GDB/MI output parsing
//!
//! Turns the text a GDB running with `--interpreter=mi` prints into typed
//! trees, and renders those trees back into GDB/MI text.
//!
//! ```
//! use gdb_mi::gdb::{ResultClass, ResultRecord};
//!
//! let record = ResultRecord::parse(r#"12^done,reason="foo""#).unwrap();
//! assert_eq!(record.token, Some(12));
//! assert_eq!(record.result_class, ResultClass::Done);
//! assert_eq!(record.data.find_child("reason").data(), "foo");
//! ```

pub mod dump;
pub mod gdb;
