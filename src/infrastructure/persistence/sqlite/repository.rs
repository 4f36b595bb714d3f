//! Repository base - 单表、单键的参数化 SQL
//!
//! 具体记录通过 [`TableRecord`] 声明表名、键列和标量列，
//! [`SqliteRepository`] 据此生成 `UPDATE` / `SELECT` 语句。

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{query::Query, FromRow, Sqlite};
use std::marker::PhantomData;

use super::DbPool;
use crate::application::ports::RepositoryError;

/// 可绑定的列值
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl ColumnValue {
    fn bind_to<'q>(
        self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            ColumnValue::Int(v) => query.bind(v),
            ColumnValue::Real(v) => query.bind(v),
            ColumnValue::Text(v) => query.bind(v),
            ColumnValue::Bool(v) => query.bind(v),
        }
    }
}

/// 单表记录声明
pub trait TableRecord: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// 表名
    const TABLE: &'static str;
    /// 键列
    const KEY: &'static str;
    /// 标量列（不含键列），顺序与 [`TableRecord::values`] 一致
    const COLUMNS: &'static [&'static str];

    fn key(&self) -> i64;

    fn values(&self) -> Vec<ColumnValue>;
}

/// 通用 Repository
pub struct SqliteRepository<R> {
    pool: DbPool,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for SqliteRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: TableRecord> SqliteRepository<R> {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// 保存记录（委托给 update）
    pub async fn save(&self, record: &R) -> Result<bool, RepositoryError> {
        self.update(record).await
    }

    /// 参数化 UPDATE，返回是否恰好影响一行
    pub async fn update(&self, record: &R) -> Result<bool, RepositoryError> {
        let sql = update_sql(R::TABLE, R::KEY, R::COLUMNS);

        let mut query = sqlx::query(&sql);
        for value in record.values() {
            query = value.bind_to(query);
        }

        let affected = query
            .bind(record.key())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .rows_affected();

        tracing::debug!(table = R::TABLE, key = record.key(), affected, "Record updated");
        Ok(affected == 1)
    }

    /// 按键读取单行
    pub async fn get(&self, key: i64) -> Result<Option<R>, RepositoryError> {
        let sql = select_sql(R::TABLE, R::KEY, R::COLUMNS);

        sqlx::query_as::<_, R>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
    }
}

fn update_sql(table: &str, key: &str, columns: &[&str]) -> String {
    let assignments = columns
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {table} SET {assignments} WHERE {key} = ?")
}

fn select_sql(table: &str, key: &str, columns: &[&str]) -> String {
    format!("SELECT {key}, {} FROM {table} WHERE {key} = ?", columns.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_sql() {
        assert_eq!(
            update_sql("setting", "book_id", &["a", "b"]),
            "UPDATE setting SET a = ?, b = ? WHERE book_id = ?"
        );
    }

    #[test]
    fn test_select_sql() {
        assert_eq!(
            select_sql("setting", "book_id", &["a", "b"]),
            "SELECT book_id, a, b FROM setting WHERE book_id = ?"
        );
    }
}
