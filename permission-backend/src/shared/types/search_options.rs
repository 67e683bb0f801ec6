// src/shared/types/search_options.rs

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const PARAM_TEXT_QUERY: &str = "q";
pub const PARAM_PAGE: &str = "p";
pub const PARAM_PAGE_SIZE: &str = "ps";
pub const PARAM_FIELDS: &str = "f";
pub const PARAM_SORT: &str = "s";
pub const PARAM_ASCENDING: &str = "asc";

/// 検索系エンドポイントの生クエリパラメータ
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub p: Option<u64>,
    pub ps: Option<u64>,
    pub f: Option<String>,
}

/// 検索系Webサービス共通のオプション
///
/// ページ番号は1始まり。fields が None の場合はフィールドフィルタなし
/// （= すべてのフィールドを返す）を意味する。
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    page: u64,
    page_size: u64,
    fields: Option<Vec<String>>,
}

impl SearchOptions {
    /// リクエストパラメータからオプションを構築
    ///
    /// `p` と `ps` は必須。欠けている場合はクライアントエラーになる。
    pub fn from_params(params: &SearchParams) -> AppResult<Self> {
        let page = params.p.ok_or_else(|| {
            AppError::ValidationError(format!("The '{}' parameter is missing", PARAM_PAGE))
        })?;
        let page_size = params.ps.ok_or_else(|| {
            AppError::ValidationError(format!("The '{}' parameter is missing", PARAM_PAGE_SIZE))
        })?;

        Ok(Self {
            page,
            page_size,
            fields: params.f.as_deref().and_then(parse_field_list),
        })
    }

    /// 1始まりのページ番号
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    /// フィールドフィルタが未指定なら常にtrue、指定済みならリスト内のフィールドのみtrue
    pub fn has_field(&self, key: &str) -> bool {
        match &self.fields {
            None => true,
            Some(fields) => fields.iter().any(|field| field == key),
        }
    }

    /// total / p / ps の統計プロパティをレスポンスオブジェクトに書き込む
    pub fn write_statistics(&self, json: &mut Map<String, Value>, total: u64) {
        json.insert("total".to_string(), total.into());
        json.insert(PARAM_PAGE.to_string(), self.page.into());
        json.insert(PARAM_PAGE_SIZE.to_string(), self.page_size.into());
    }
}

fn parse_field_list(raw: &str) -> Option<Vec<String>> {
    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect();

    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

/// ルート定義時に登録されるパラメータ定義
#[derive(Debug, Clone, Serialize)]
pub struct ParamDefinition {
    pub key: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<String>>,
}

/// 検索系エンドポイント共通の f / p / ps パラメータ定義を返す
///
/// ルート登録時に一度だけ呼ばれる。リクエストごとには実行されない。
pub fn define_generic_parameters(possible_field_values: &[&str]) -> Vec<ParamDefinition> {
    // f の例示値には候補リストの先頭2つをカンマ区切りで使う
    let fields_example = if possible_field_values.len() > 1 {
        Some(format!(
            "{},{}",
            possible_field_values[0], possible_field_values[1]
        ))
    } else {
        None
    };

    vec![
        ParamDefinition {
            key: PARAM_FIELDS,
            description: "Comma-separated list of the fields to be returned in response. \
                          All the fields are returned by default.",
            example_value: fields_example,
            default_value: None,
            possible_values: Some(
                possible_field_values
                    .iter()
                    .map(|value| value.to_string())
                    .collect(),
            ),
        },
        ParamDefinition {
            key: PARAM_PAGE,
            description: "1-based page number",
            example_value: Some("42".to_string()),
            default_value: Some("1"),
            possible_values: None,
        },
        ParamDefinition {
            key: PARAM_PAGE_SIZE,
            description: "Page size. Must be greater than 0.",
            example_value: Some("10".to_string()),
            default_value: Some("25"),
            possible_values: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_params_with_mandatory_values() {
        let params = SearchParams {
            p: Some(1),
            ps: Some(25),
            f: None,
        };
        let options = SearchOptions::from_params(&params).unwrap();

        assert_eq!(options.page(), 1);
        assert_eq!(options.page_size(), 25);
        assert!(options.fields().is_none());
    }

    #[test]
    fn test_from_params_missing_page_fails() {
        let params = SearchParams {
            p: None,
            ps: Some(25),
            f: None,
        };
        let err = SearchOptions::from_params(&params).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_from_params_missing_page_size_fails() {
        let params = SearchParams {
            p: Some(1),
            ps: None,
            f: None,
        };
        let err = SearchOptions::from_params(&params).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_from_params_parses_field_list() {
        let params = SearchParams {
            p: Some(2),
            ps: Some(10),
            f: Some("name, login".to_string()),
        };
        let options = SearchOptions::from_params(&params).unwrap();
        assert_eq!(
            options.fields(),
            Some(&["name".to_string(), "login".to_string()][..])
        );
    }

    #[test]
    fn test_has_field_without_filter_returns_true_for_anything() {
        let options = SearchOptions::from_params(&SearchParams {
            p: Some(1),
            ps: Some(25),
            f: None,
        })
        .unwrap();

        // フィルタなしは「すべてのフィールド」を意味する
        assert!(options.has_field("login"));
        assert!(options.has_field("anything"));
    }

    #[test]
    fn test_has_field_with_filter_only_matches_listed_names() {
        let options = SearchOptions::from_params(&SearchParams {
            p: Some(1),
            ps: Some(25),
            f: Some("name,login".to_string()),
        })
        .unwrap();

        assert!(options.has_field("login"));
        assert!(options.has_field("name"));
        assert!(!options.has_field("email"));
    }

    #[test]
    fn test_write_statistics_emits_total_page_and_page_size() {
        let options = SearchOptions::from_params(&SearchParams {
            p: Some(3),
            ps: Some(50),
            f: None,
        })
        .unwrap();

        let mut json = Map::new();
        options.write_statistics(&mut json, 123);

        assert_eq!(json.get("total"), Some(&Value::from(123)));
        assert_eq!(json.get(PARAM_PAGE), Some(&Value::from(3)));
        assert_eq!(json.get(PARAM_PAGE_SIZE), Some(&Value::from(50)));
        assert_eq!(json.len(), 3);
    }

    #[test]
    fn test_define_generic_parameters() {
        let definitions = define_generic_parameters(&["login", "name", "email"]);
        assert_eq!(definitions.len(), 3);

        let fields = &definitions[0];
        assert_eq!(fields.key, PARAM_FIELDS);
        assert_eq!(fields.example_value.as_deref(), Some("login,name"));

        let page = &definitions[1];
        assert_eq!(page.key, PARAM_PAGE);
        assert_eq!(page.default_value, Some("1"));

        let page_size = &definitions[2];
        assert_eq!(page_size.key, PARAM_PAGE_SIZE);
        assert_eq!(page_size.default_value, Some("25"));
    }

    #[test]
    fn test_define_generic_parameters_single_value_has_no_example() {
        let definitions = define_generic_parameters(&["login"]);
        assert!(definitions[0].example_value.is_none());
    }
}
