use majoba_core::search::{self, Page, PageRequest};
use majoba_db::models::user::{User, UserSearchHit};
use majoba_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::access::require_staff;
use crate::config::ManagerConfig;
use crate::error::ManagerResult;

/// Paginated, case-insensitive search over username and first/last name.
///
/// Staff only. Pages hold `config.search_page_size` hits; a missing or
/// unparseable `raw_page` is page 1. A blank query returns an empty page
/// without querying.
#[tracing::instrument(skip(pool, config, requester), fields(requester_id = requester.id))]
pub async fn search_users(
    pool: &PgPool,
    config: &ManagerConfig,
    requester: &User,
    raw_query: &str,
    raw_page: Option<&str>,
) -> ManagerResult<Page<UserSearchHit>> {
    require_staff(requester, "search users")?;

    let page = PageRequest::from_raw(raw_page, config.search_page_size);

    let Some(term) = search::normalize_query(raw_query) else {
        return Ok(Page::empty(page));
    };
    let pattern = format!("%{}%", search::escape_like(term));

    let total = UserRepo::count_search(pool, &pattern).await?;
    let users = UserRepo::search(pool, &pattern, page.limit(), page.offset()).await?;

    Ok(Page {
        items: users.iter().map(UserSearchHit::from).collect(),
        total,
        page: page.page,
        per_page: page.per_page,
    })
}
