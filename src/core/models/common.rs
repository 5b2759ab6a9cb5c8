use serde::Serialize;

/// Uniform result of every mutation: the affected row and a success flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mutation<T> {
    pub data: T,
    pub success: bool,
}

impl<T> Mutation<T> {
    pub fn new(data: T) -> Self {
        Self { data, success: true }
    }
}
