// src/shared/types/doc.rs

use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};

/// 検索結果ドキュメントのフィールドマップラッパー
///
/// 宣言されていないキーへのアクセスはプログラミングエラー
/// （クエリがそのフィールドを要求していない）として内部エラーになる。
#[derive(Debug, Clone)]
pub struct Doc {
    fields: Map<String, Value>,
}

impl Doc {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// フィールド値を取得。値はタグ付きの `serde_json::Value` なので
    /// 呼び出し側が型を検証して取り出す。
    pub fn get_field(&self, key: &str) -> AppResult<&Value> {
        self.fields.get(key).ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Field {} not specified in query options",
                key
            ))
        })
    }
}

impl From<Map<String, Value>> for Doc {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
