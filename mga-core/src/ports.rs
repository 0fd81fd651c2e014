mod oracle;
pub use oracle::{Oracle, Solve};
