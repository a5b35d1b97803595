// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Drives list and history operations through their continuation markers.
//!
//! Two flavours of item limit exist. Older list operations (`ListFunctions`,
//! `ListAliases`, `ListVersionsByFunction`) treat it as a budget across all
//! pages: every call asks for `min(server maximum, remaining budget)` items
//! and the loop ends once the budget is spent. Newer operations forward the
//! limit as the page size of every call.

use crate::error::{LambctlError, Result};
use crate::schema::PagingSpec;
use log::{info, warn};
use serde_json::Value;
use std::future::Future;

/// What happens when a page fails after earlier pages succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialFailurePolicy {
    /// Every failure propagates.
    Surface,
    /// Under an item budget with at least one item already collected, the
    /// failure ends the loop and the items so far are returned. Otherwise
    /// the failure propagates.
    TruncateWhenBudgeted,
}

impl Default for PartialFailurePolicy {
    fn default() -> Self {
        PartialFailurePolicy::TruncateWhenBudgeted
    }
}

/// How a paginated command walks its pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagingOptions {
    /// The marker to start from. Implies a single page.
    pub marker:            Option<String>,
    /// Fetch a single page only.
    pub no_auto_iteration: bool,
    /// The item budget or page size. Zero means the server default.
    pub max_items:         Option<u32>,
    /// What to do when a later page fails.
    pub policy:            PartialFailurePolicy,
}

impl PagingOptions {
    /// Returns true if exactly one page is fetched.
    pub fn is_manual(&self) -> bool {
        self.marker.is_some() || self.no_auto_iteration
    }
}

/// The marker and page size of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// The continuation marker, absent on the first page.
    pub marker:    Option<String>,
    /// The requested page size, absent for the server default.
    pub page_size: Option<u32>,
}

/// One page of a paginated response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The items of the page.
    pub items:       Vec<Value>,
    /// The marker of the next page. Empty markers are treated as absent.
    pub next_marker: Option<String>,
    /// The response document the page was read from.
    pub response:    Value,
}

impl Page {
    /// Reads the items and next marker out of a response document.
    pub fn from_response(spec: &PagingSpec, response: Value) -> Page {
        let items = response
            .get(spec.items_field)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next_marker = response
            .get(spec.next_marker_field)
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        Page {
            items,
            next_marker,
            response,
        }
    }
}

/// Everything collected across the pages of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult {
    /// The items of all pages, in order.
    pub items:       Vec<Value>,
    /// The last response with its items replaced by all collected items.
    pub response:    Value,
    /// The marker of the page after the last one fetched.
    pub next_marker: Option<String>,
    /// The number of calls issued.
    pub calls:       usize,
    /// Whether a failure cut the loop short.
    pub truncated:   bool,
}

/// Fetches pages until the marker runs out, the budget is spent or a single
/// page was asked for.
///
/// # Arguments
/// * `spec` - The pagination description of the operation.
/// * `options` - The caller's paging flags.
/// * `fetch` - Issues one call and returns its response document.
pub async fn paginate<F, Fut>(
    spec: &PagingSpec,
    options: &PagingOptions,
    mut fetch: F,
) -> Result<PagedResult>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let limit = options.max_items.filter(|n| *n > 0);
    let budget = if spec.legacy_budget { limit } else { None };
    let manual = options.is_manual();

    let mut marker = options.marker.clone();
    let mut items: Vec<Value> = vec![];
    let mut last_response = Value::Null;
    let mut next_marker = None;
    let mut calls = 0;
    let mut truncated = false;

    loop {
        let page_size = match budget {
            Some(budget) => Some(spec.server_max.min(budget - items.len() as u32)),
            None => limit,
        };
        calls += 1;
        let response = match fetch(PageRequest {
            marker: marker.clone(),
            page_size,
        })
        .await
        {
            Ok(response) => response,
            Err(LambctlError::Cancelled) => return Err(LambctlError::Cancelled),
            Err(e) => {
                if options.policy == PartialFailurePolicy::TruncateWhenBudgeted
                    && budget.is_some()
                    && !items.is_empty()
                {
                    warn!(
                        "Page {} failed after {} items; returning the items collected so far: {}",
                        calls,
                        items.len(),
                        e
                    );
                    truncated = true;
                    break;
                }
                return Err(e);
            }
        };

        let page = Page::from_response(spec, response);
        items.extend(page.items);
        last_response = page.response;
        next_marker = page.next_marker;
        info!("Fetched page {}: {} items so far.", calls, items.len());

        if let Some(budget) = budget {
            if items.len() >= budget as usize {
                items.truncate(budget as usize);
                break;
            }
        }
        if manual {
            break;
        }
        match &next_marker {
            Some(next) if marker.as_ref() == Some(next) => {
                warn!("The service returned the marker it was sent; stopping.");
                break;
            }
            Some(next) => marker = Some(next.clone()),
            None => break,
        }
    }

    let response = merge_pages(spec, last_response, &items, next_marker.as_deref());
    Ok(PagedResult {
        items,
        response,
        next_marker,
        calls,
        truncated,
    })
}

/// Replaces the items and marker of the last response with the collected
/// ones.
fn merge_pages(spec: &PagingSpec, response: Value, items: &[Value], next: Option<&str>) -> Value {
    let mut document = match response {
        Value::Object(document) => document,
        _ => serde_json::Map::new(),
    };
    document.insert(spec.items_field.to_string(), Value::Array(items.to_vec()));
    match next {
        Some(next) => {
            document.insert(
                spec.next_marker_field.to_string(),
                Value::String(next.to_string()),
            );
        }
        None => {
            document.remove(spec.next_marker_field);
        }
    }
    Value::Object(document)
}
