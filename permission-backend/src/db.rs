// src/db.rs
use crate::config::Config;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::future::Future;
use std::time::Duration;

pub type DbPool = DatabaseConnection;

/// IN句に渡せるパラメータ数の上限（Oracleの1,000件制限に合わせる）
pub const IN_CLAUSE_PARTITION_SIZE: usize = 1000;

pub async fn create_db_pool(config: &Config) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());

    // 接続オプションを設定
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8 * 60));

    Database::connect(opt).await
}

/// 大きな入力コレクションをIN句の上限以下のバッチに分割して実行し、結果をマージする
///
/// 空の入力の場合はクエリを一切実行せずに空のVecを返す。
pub async fn execute_large_inputs<I, O, E, F, Fut>(inputs: &[I], mut execute: F) -> Result<Vec<O>, E>
where
    I: Clone,
    F: FnMut(Vec<I>) -> Fut,
    Fut: Future<Output = Result<Vec<O>, E>>,
{
    if inputs.is_empty() {
        return Ok(Vec::new());
    }

    let mut merged = Vec::with_capacity(inputs.len());
    for chunk in inputs.chunks(IN_CLAUSE_PARTITION_SIZE) {
        let mut batch = execute(chunk.to_vec()).await?;
        merged.append(&mut batch);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[tokio::test]
    async fn test_execute_large_inputs_partitions_and_merges() {
        let inputs: Vec<i64> = (0..2500).collect();
        let batch_sizes = RefCell::new(Vec::new());

        // 各バッチをそのまま返すエグゼキュータ。マージ結果は分割なしの呼び出しと一致するはず
        let merged = execute_large_inputs(&inputs, |batch| {
            batch_sizes.borrow_mut().push(batch.len());
            async move { Ok::<_, ()>(batch) }
        })
        .await
        .unwrap();

        assert_eq!(merged, inputs);
        assert_eq!(*batch_sizes.borrow(), vec![1000, 1000, 500]);
    }

    #[tokio::test]
    async fn test_execute_large_inputs_exact_partition_boundary() {
        let inputs: Vec<i64> = (0..1000).collect();
        let call_count = RefCell::new(0usize);

        let merged = execute_large_inputs(&inputs, |batch| {
            *call_count.borrow_mut() += 1;
            async move { Ok::<_, ()>(batch) }
        })
        .await
        .unwrap();

        // ちょうど上限サイズの入力は1回の呼び出しで処理される
        assert_eq!(merged.len(), 1000);
        assert_eq!(*call_count.borrow(), 1);
    }

    #[tokio::test]
    async fn test_execute_large_inputs_empty_input_executes_nothing() {
        let inputs: Vec<i64> = Vec::new();
        let call_count = RefCell::new(0usize);

        let merged = execute_large_inputs(&inputs, |batch| {
            *call_count.borrow_mut() += 1;
            async move { Ok::<_, ()>(batch) }
        })
        .await
        .unwrap();

        assert!(merged.is_empty());
        assert_eq!(*call_count.borrow(), 0);
    }

    #[tokio::test]
    async fn test_execute_large_inputs_propagates_errors() {
        let inputs: Vec<i64> = (0..1500).collect();

        let result = execute_large_inputs(&inputs, |batch| async move {
            if batch.contains(&1200) {
                Err("boom")
            } else {
                Ok(batch)
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "boom");
    }
}
