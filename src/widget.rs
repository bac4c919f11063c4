//! Widget controller and the conversation surface it draws on.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::error::{SurfaceError, WidgetError};
use crate::message::Message;
use crate::render::{self, Element, ElementId, MessageElement};
use crate::services::chat_client::ChatBackend;
use crate::services::session_token::generate_session_id;

pub const WELCOME_MESSAGE: &str = "Hi! I'm your virtual assistant, how can I help you today?";
pub const ERROR_MESSAGE: &str = "Sorry, an error occurred. Please try again.";
pub const CLEAR_ERROR_MESSAGE: &str =
    "Sorry, an error occurred while clearing the history. Please try again.";

/// Delay before forcing the container to its end, after the smooth scroll.
pub const SCROLL_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Scroll the `anchor` element into view, then force scroll-to-end after
/// `settle_delay` to cover late layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollPlan {
    pub anchor: ElementId,
    pub settle_delay: Duration,
}

/// The container messages are appended to.
pub trait ChatSurface {
    fn append(&mut self, element: Element) -> Result<ElementId, SurfaceError>;
    fn remove(&mut self, id: ElementId) -> Result<(), SurfaceError>;
    fn clear(&mut self) -> Result<(), SurfaceError>;
    /// Bring the newest element fully into view.
    fn scroll_to_latest(&mut self);
}

/// In-memory conversation container.
#[derive(Debug, Default)]
pub struct Conversation {
    elements: Vec<(ElementId, Element)>,
    next_id: u64,
    scroll: Option<ScrollPlan>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[(ElementId, Element)] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Rendered messages in order, typing indicators excluded.
    pub fn messages(&self) -> impl Iterator<Item = &MessageElement> {
        self.elements.iter().filter_map(|(_, element)| element.as_message())
    }

    pub fn has_typing_indicator(&self) -> bool {
        self.elements.iter().any(|(_, element)| element.is_typing())
    }

    pub fn scroll_plan(&self) -> Option<ScrollPlan> {
        self.scroll
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for (id, element) in &self.elements {
            element.write_html(Some(*id), &mut out);
        }
        out
    }
}

impl ChatSurface for Conversation {
    fn append(&mut self, element: Element) -> Result<ElementId, SurfaceError> {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.push((id, element));
        Ok(id)
    }

    fn remove(&mut self, id: ElementId) -> Result<(), SurfaceError> {
        let index = self
            .elements
            .iter()
            .position(|(existing, _)| *existing == id)
            .ok_or(SurfaceError::Detached(id))?;
        self.elements.remove(index);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.elements.clear();
        self.scroll = None;
        Ok(())
    }

    fn scroll_to_latest(&mut self) {
        self.scroll = self.elements.last().map(|(id, _)| ScrollPlan {
            anchor: *id,
            settle_delay: SCROLL_SETTLE_DELAY,
        });
    }
}

/// A submission between sending the query and receiving the reply.
#[derive(Debug)]
pub struct PendingSubmit {
    pub session_id: String,
    pub query: String,
    generation: u64,
    typing: ElementId,
}

/// Chat widget controller: one per page.
#[derive(Debug)]
pub struct ChatWidget<S> {
    surface: S,
    session_id: String,
    input_enabled: bool,
    generation: u64,
    avatar_src: String,
}

impl<S: ChatSurface> ChatWidget<S> {
    pub fn new(surface: S, avatar_src: impl Into<String>) -> Result<Self, WidgetError> {
        let mut widget = Self {
            surface,
            session_id: generate_session_id(),
            input_enabled: true,
            generation: 0,
            avatar_src: avatar_src.into(),
        };
        widget.add_message(Message::bot(WELCOME_MESSAGE))?;
        info!(session_id = %widget.session_id, "chat widget ready");
        Ok(widget)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Render `message`, append it and scroll it into view.
    pub fn add_message(&mut self, message: Message) -> Result<ElementId, SurfaceError> {
        let element = render::render_message(&message, &self.avatar_src);
        let id = self.surface.append(Element::Message(element))?;
        self.surface.scroll_to_latest();
        Ok(id)
    }

    fn add_typing_indicator(&mut self) -> Result<ElementId, SurfaceError> {
        let id = self.surface.append(render::typing_indicator(&self.avatar_src))?;
        self.surface.scroll_to_latest();
        Ok(id)
    }

    /// Start a submission. Returns `None` for blank input or while another
    /// submission holds the input disabled.
    pub fn begin_submit(&mut self, raw: &str) -> Option<PendingSubmit> {
        let query = raw.trim();
        if query.is_empty() {
            return None;
        }
        if !self.input_enabled {
            debug!("input disabled, ignoring submission");
            return None;
        }
        self.input_enabled = false;

        let typing = self
            .add_message(Message::user(query))
            .and_then(|_| self.add_typing_indicator());

        match typing {
            Ok(typing) => Some(PendingSubmit {
                session_id: self.session_id.clone(),
                query: query.to_string(),
                generation: self.generation,
                typing,
            }),
            Err(err) => {
                self.report_failure(&WidgetError::from(err), ERROR_MESSAGE);
                self.finish();
                None
            }
        }
    }

    /// Apply the backend's answer to a submission started by
    /// [`begin_submit`](Self::begin_submit). Replies for a conversation that
    /// has since been cleared are dropped.
    pub fn complete_submit(&mut self, pending: PendingSubmit, result: Result<String, WidgetError>) {
        let stale = pending.generation != self.generation;

        if let Err(err) = self.surface.remove(pending.typing) {
            if !stale {
                warn!(error = %err, "typing indicator already gone");
            }
        }

        if stale {
            debug!(
                session_id = %pending.session_id,
                ok = result.is_ok(),
                "discarding reply for a cleared conversation"
            );
        } else {
            let outcome = match result {
                Ok(text) if text.is_empty() => Ok(()),
                Ok(text) => self.add_message(Message::bot(text)).map(|_| ()).map_err(WidgetError::from),
                Err(err) => Err(err),
            };
            if let Err(err) = outcome {
                self.report_failure(&err, ERROR_MESSAGE);
            }
        }

        self.finish();
    }

    /// Send `raw` through `backend` and render the reply.
    pub async fn submit<B: ChatBackend>(&mut self, backend: &B, raw: &str) {
        let Some(pending) = self.begin_submit(raw) else {
            return;
        };
        let result = backend.send(&pending.session_id, &pending.query).await;
        self.complete_submit(pending, result);
    }

    /// Reset the conversation to the welcome message under a new session token.
    pub fn clear_history(&mut self) -> Result<(), WidgetError> {
        self.surface.clear().map_err(WidgetError::ClearHistory)?;
        self.add_message(Message::bot(WELCOME_MESSAGE))
            .map_err(WidgetError::ClearHistory)?;
        // Token and generation only rotate once the reset fully succeeded.
        self.session_id = generate_session_id();
        self.generation += 1;
        info!(session_id = %self.session_id, "conversation cleared");
        Ok(())
    }

    /// Clear button handler.
    pub fn handle_clear(&mut self) {
        if let Err(err) = self.clear_history() {
            self.report_failure(&err, CLEAR_ERROR_MESSAGE);
        }
    }

    fn report_failure(&mut self, err: &WidgetError, apology: &str) {
        error!(error = %err, session_id = %self.session_id, "chat action failed");
        if let Err(err) = self.add_message(Message::bot(apology)) {
            error!(error = %err, "could not show error message");
        }
    }

    fn finish(&mut self) {
        self.input_enabled = true;
        self.surface.scroll_to_latest();
    }
}
