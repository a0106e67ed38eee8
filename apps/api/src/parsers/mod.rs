// Loose-text parsers for job fields. None of them fail: unparseable input
// degrades to `None`, `unknown` or an empty list.

pub mod posted_date;
pub mod salary;
pub mod semantic_fit;
