//! # バケットレジストリ
//!
//! アプリケーション名 → バケット名の対応表。起動時に一度だけ構築し、以後は読み取り専用。

/// アプリケーション名とバケット名の対応表。
///
/// 登録順を保持する（エラーメッセージで許可値を列挙する順序になる）。
#[derive(Debug, Clone, Default)]
pub struct BucketRegistry {
    entries: Vec<(String, String)>,
}

impl BucketRegistry {
    /// (アプリ名, バケット名) の組から構築する。
    /// 同じアプリ名が複数回現れた場合は後の値で上書きする。
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (app, bucket) in pairs {
            let app = app.into();
            let bucket = bucket.into();
            match entries.iter_mut().find(|(name, _)| *name == app) {
                Some(entry) => entry.1 = bucket,
                None => entries.push((app, bucket)),
            }
        }
        Self { entries }
    }

    /// 各アプリの `<APP>_BUCKET_NAME` を `lookup` から読み込んで構築する。
    /// 未設定のアプリは空文字のバケットとして登録される（リクエスト時に設定エラーとなる）。
    pub fn from_lookup<F>(app_names: &[String], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_pairs(app_names.iter().map(|app| {
            let bucket = lookup(&bucket_env_var(app)).unwrap_or_default();
            (app.clone(), bucket)
        }))
    }

    /// アプリ名に対応するバケット名。未登録なら `None`。
    pub fn resolve(&self, app_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == app_name)
            .map(|(_, bucket)| bucket.as_str())
    }

    /// 登録済みアプリ名（登録順）
    pub fn app_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// アプリ名に対応するバケット名の環境変数名（例: "exam" → "EXAM_BUCKET_NAME"）
pub fn bucket_env_var(app_name: &str) -> String {
    format!(
        "{}_BUCKET_NAME",
        app_name.to_ascii_uppercase().replace('-', "_")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_resolve_and_order() {
        let registry = BucketRegistry::from_pairs([
            ("question", "question-bucket"),
            ("exam", "exam-bucket"),
            ("books", ""),
        ]);

        assert_eq!(registry.resolve("exam"), Some("exam-bucket"));
        assert_eq!(registry.resolve("books"), Some(""));
        assert_eq!(registry.resolve("videos"), None);
        assert_eq!(registry.app_names(), vec!["question", "exam", "books"]);
    }

    #[test]
    fn test_duplicate_app_overwrites() {
        let registry = BucketRegistry::from_pairs([("exam", "old"), ("books", "b"), ("exam", "new")]);
        assert_eq!(registry.resolve("exam"), Some("new"));
        assert_eq!(registry.app_names(), vec!["exam", "books"]);
    }

    #[test]
    fn test_from_lookup_reads_per_app_variables() {
        let vars: HashMap<&str, &str> = [
            ("QUESTION_BUCKET_NAME", "q-bucket"),
            ("EXAM_BUCKET_NAME", "e-bucket"),
        ]
        .into_iter()
        .collect();
        let apps = vec!["question".to_string(), "exam".to_string(), "books".to_string()];

        let registry = BucketRegistry::from_lookup(&apps, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(registry.resolve("question"), Some("q-bucket"));
        assert_eq!(registry.resolve("exam"), Some("e-bucket"));
        // 未設定のアプリは空文字で登録される
        assert_eq!(registry.resolve("books"), Some(""));
    }

    #[test]
    fn test_bucket_env_var() {
        assert_eq!(bucket_env_var("exam"), "EXAM_BUCKET_NAME");
        assert_eq!(bucket_env_var("past-papers"), "PAST_PAPERS_BUCKET_NAME");
    }
}
