use serde::{Deserialize, Serialize};

use super::BookId;

/// 書籍
///
/// `id` はストアへの登録時に採番され、以降は変更されない。
/// 未登録の書籍は `id` を持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl Book {
    /// 未登録の書籍を作成する
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }

    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }
}

/// 書籍の例示検索条件
///
/// 空でない項目のみが条件となり、大文字小文字を区別しない部分一致で比較する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookFilter {
    /// 空白のみの項目を取り除いた条件を返す
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            title: keep(self.title),
            author: keep(self.author),
            isbn: keep(self.isbn),
        }
    }

    /// 書籍が条件に一致するか
    pub fn matches(&self, book: &Book) -> bool {
        fn contains(field: &str, needle: &Option<String>) -> bool {
            match needle {
                Some(needle) => field.to_lowercase().contains(&needle.to_lowercase()),
                None => true,
            }
        }

        contains(&book.title, &self.title)
            && contains(&book.author, &self.author)
            && contains(&book.isbn, &self.isbn)
    }
}
