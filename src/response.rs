use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct List<T> {
    list: Vec<T>,
    total: i64,
}

impl<T> List<T> {
    pub fn new(list: Vec<T>, total: i64) -> Self {
        List { list, total }
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(list: Vec<T>) -> Self {
        let total = list.len() as i64;
        List::new(list, total)
    }
}

/// Body of a single-record read.
#[derive(Debug, Serialize)]
pub struct Item<T> {
    data: T,
}

impl<T> Item<T> {
    pub fn new(data: T) -> Self {
        Item { data }
    }
}
