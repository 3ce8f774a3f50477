//! Cursor-driven pagination over GitHub list endpoints
//!
//! GitHub advertises the next page through the `Link` response header
//! (`<https://api.github.com/user/repos?page=2>; rel="next"`). The URL is
//! treated as an opaque [`PageCursor`].

use reqwest::header::{HeaderMap, LINK};
use reqwest::Method;
use url::Url;

use super::client::{RawResponse, RemoteClient};
use super::error::{RemoteError, RemoteResult};

/// Opaque continuation token for the next page of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(Url);

impl PageCursor {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn into_url(self) -> Url {
        self.0
    }
}

/// Extract the `rel="next"` cursor from response headers.
///
/// A cursor pointing at a different origin than `base` is rejected so the
/// credential is never sent elsewhere.
pub(crate) fn next_cursor(headers: &HeaderMap, base: &Url) -> RemoteResult<Option<PageCursor>> {
    let Some(link) = headers.get(LINK) else {
        return Ok(None);
    };
    let link = link
        .to_str()
        .map_err(|_| RemoteError::malformed("Link header is not valid text"))?;

    let Some(target) = parse_next_link(link) else {
        return Ok(None);
    };
    let url = Url::parse(target)
        .map_err(|_| RemoteError::malformed(format!("invalid next page link: {target}")))?;

    if url.origin() != base.origin() {
        return Err(RemoteError::malformed("next page link points at a different host"));
    }
    Ok(Some(PageCursor(url)))
}

/// Find the target of the `rel="next"` entry in a `Link` header value
fn parse_next_link(header: &str) -> Option<&str> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if is_next {
            target.strip_prefix('<')?.strip_suffix('>')
        } else {
            None
        }
    })
}

enum PageState {
    Pending(Url),
    Failed(RemoteError),
    Done,
}

/// Lazy sequence of list pages.
///
/// Finite (ends once GitHub stops sending a next cursor) and not
/// restartable: after yielding `None` or an error it stays exhausted. A
/// fresh [`RemoteClient::list_paged`] call re-issues every page.
pub struct Pages<'a> {
    client: &'a RemoteClient,
    state: PageState,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(client: &'a RemoteClient, first: RemoteResult<Url>) -> Self {
        let state = match first {
            Ok(url) => PageState::Pending(url),
            Err(e) => PageState::Failed(e),
        };
        Self { client, state }
    }

    /// Fetch the next page, or `None` once the list is exhausted
    pub async fn next_page(&mut self) -> Option<RemoteResult<RawResponse>> {
        let url = match std::mem::replace(&mut self.state, PageState::Done) {
            PageState::Pending(url) => url,
            PageState::Failed(e) => return Some(Err(e)),
            PageState::Done => return None,
        };

        let page = match self.client.execute(Method::GET, url, None).await {
            Ok(page) => page,
            Err(e) => return Some(Err(e)),
        };
        match next_cursor(&page.headers, self.client.base_url()) {
            Ok(Some(cursor)) => self.state = PageState::Pending(cursor.into_url()),
            Ok(None) => {}
            Err(e) => return Some(Err(e)),
        }
        Some(Ok(page))
    }
}
