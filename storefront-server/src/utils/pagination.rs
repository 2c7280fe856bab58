//! 分页参数与分页计算

use serde::{Deserialize, Serialize};

use crate::utils::AppError;

pub const DEFAULT_PER_PAGE: u64 = 10;
const MAX_PER_PAGE: u64 = 100;

/// `?page=&perPage=` (also `limit`)
///
/// Values that do not parse fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default, rename = "perPage", alias = "limit")]
    pub per_page: Option<String>,
}

/// Normalized page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl PageQuery {
    pub fn resolve(&self) -> Page {
        Page::new(
            parse_positive(self.page.as_deref()),
            parse_positive(self.per_page.as_deref()),
        )
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).filter(|v| *v > 0)
}

impl Page {
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    /// Rows to skip
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page)
    }

    /// A page past the end is an error unless the listing is empty
    pub fn check(&self, total: u64) -> Result<u64, AppError> {
        let total_pages = self.total_pages(total);
        if total_pages > 0 && self.page > total_pages {
            return Err(AppError::page_not_found());
        }
        Ok(total_pages)
    }
}

/// Paginated list payload: `{items, total, totalPages, page, perPage}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: u64, page: Page) -> Self {
        Self {
            items,
            total,
            total_pages: page.total_pages(total),
            page: page.page,
            per_page: page.per_page,
        }
    }
}
