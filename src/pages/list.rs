//! Post listing with infinite scroll.

use crate::api::{ApiError, BoardApi, PostSummary};
use crate::session::Session;
use crate::ui::{PostCard, PostListView, Route, Toast};
use crate::util::{format_date, format_number, parse_timestamp, Gate, DEFAULT_DATE_FORMAT};
use std::sync::Arc;
use std::time::Duration;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load posts.";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in first.";
pub const DEFAULT_AUTHOR_IMAGE: &str = "/default-profile.png";

/// Distance from the bottom, in pixels, that triggers the next page.
pub const SCROLL_THRESHOLD_PX: f64 = 200.0;
/// Minimum spacing between scroll-triggered loads.
pub const SCROLL_THROTTLE: Duration = Duration::from_millis(200);

pub struct PostListPage<V> {
    api: Arc<dyn BoardApi>,
    session: Session,
    view: V,
    page_size: u32,
    current_page: u32,
    has_more: bool,
    loading: bool,
    posts: Vec<PostSummary>,
    scroll_gate: Gate,
}

impl<V: PostListView> PostListPage<V> {
    pub fn new(api: Arc<dyn BoardApi>, session: Session, view: V, page_size: u32) -> Self {
        Self {
            api,
            session,
            view,
            page_size: page_size.max(1),
            current_page: 1,
            has_more: true,
            loading: false,
            posts: Vec::new(),
            scroll_gate: Gate::new(SCROLL_THROTTLE),
        }
    }

    /// Reflect the sign-in state and fetch the first page.
    ///
    /// A failed load is returned as well as toasted.
    pub async fn init(&mut self) -> Result<usize, ApiError> {
        self.view.set_signed_in(self.session.is_authenticated());
        self.try_load_more().await
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Next page to request (starts at 1).
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Fetch and append the next page. Returns how many posts were added;
    /// failures are toasted and count as zero.
    pub async fn load_more(&mut self) -> usize {
        self.try_load_more().await.unwrap_or(0)
    }

    async fn try_load_more(&mut self) -> Result<usize, ApiError> {
        if self.loading || !self.has_more {
            return Ok(0);
        }

        self.loading = true;
        self.view.set_loading(true);
        let result = self.api.list_posts(self.current_page, self.page_size).await;
        self.loading = false;
        self.view.set_loading(false);

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(page = self.current_page, "Loading posts failed: {e}");
                self.view.toast(Toast::error(LOAD_FAILED_MESSAGE));
                return Err(e);
            }
        };

        if page.posts.is_empty() {
            if self.current_page == 1 {
                self.view.show_empty();
            }
            self.has_more = false;
            return Ok(0);
        }

        self.view.hide_empty();
        for post in &page.posts {
            self.view.append_post(&post_card(post));
        }
        let added = page.posts.len();
        self.posts.extend(page.posts);
        self.has_more = page.has_more;
        self.current_page += 1;
        tracing::debug!(added, next_page = self.current_page, "Posts appended");
        Ok(added)
    }

    /// Scroll position callback. Loads the next page when the viewport is
    /// within [`SCROLL_THRESHOLD_PX`] of the bottom.
    pub async fn on_scroll(
        &mut self,
        scroll_top: f64,
        client_height: f64,
        scroll_height: f64,
    ) -> usize {
        if scroll_height - scroll_top - client_height >= SCROLL_THRESHOLD_PX {
            return 0;
        }
        if self.loading || !self.has_more || !self.scroll_gate.try_pass() {
            return 0;
        }
        self.load_more().await
    }

    pub fn on_write_click(&mut self) {
        if !self.session.is_authenticated() {
            self.view.toast(Toast::warning(LOGIN_REQUIRED_MESSAGE));
            self.view.navigate(Route::Login);
            return;
        }
        self.view.navigate(Route::WritePost);
    }

    pub fn on_post_click(&mut self, id: u64) {
        self.view.navigate(Route::PostDetail(id));
    }
}

/// Render a post row for display. Unparseable timestamps are shown as sent.
pub fn post_card(post: &PostSummary) -> PostCard {
    let created_at = parse_timestamp(&post.created_at)
        .map(|ts| format_date(&ts, DEFAULT_DATE_FORMAT))
        .unwrap_or_else(|| post.created_at.clone());
    PostCard {
        id: post.id,
        title: post.title.clone(),
        likes: format_number(post.likes),
        comments: format_number(post.comment_count),
        views: format_number(post.views),
        author: post.author.nickname.clone(),
        author_image: post
            .author
            .profile_image
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR_IMAGE.to_string()),
        created_at,
    }
}
