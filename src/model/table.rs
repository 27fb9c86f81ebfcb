use std::marker::PhantomData;

use crate::dao::PoolType;

/// Typed handle over the shared pool; queries for entity `T` are
/// implemented on `Table<T>` in `dao::postgre`.
#[derive(Debug)]
pub struct Table<T> {
    pub pool: PoolType,
    _entity: PhantomData<T>,
}

impl<T> Table<T> {
    pub fn new(pool: PoolType) -> Self {
        Table {
            pool,
            _entity: PhantomData,
        }
    }
}
