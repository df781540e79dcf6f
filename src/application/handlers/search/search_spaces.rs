//! SearchSpacesHandler - answers a search message from the stored records.

use std::sync::Arc;

use crate::application::services::{CallContext, ReplyKind, ResponseSynthesizer};
use crate::domain::conversation::{Turn, TurnMetadata};
use crate::domain::replies;
use crate::domain::space::{search_records, SearchMode, SpaceListing};
use crate::ports::SpaceRepository;

/// Command to search spaces with a free-text message.
#[derive(Debug, Clone)]
pub struct SearchSpacesCommand {
    pub message: String,
}

/// Result of a search. Store failures are folded into [`SearchMode::Error`].
#[derive(Debug, Clone)]
pub struct SearchSpacesResult {
    pub reply: String,
    pub listings: Vec<SpaceListing>,
    pub search_mode: SearchMode,
}

impl SearchSpacesResult {
    pub fn total_count(&self) -> usize {
        self.listings.len()
    }

    /// Metadata recorded on the assistant turn.
    pub fn metadata(&self) -> TurnMetadata {
        TurnMetadata::SearchResults {
            total_count: self.total_count(),
            space_ids: self.listings.iter().map(|l| l.space_id.clone()).collect(),
            search_mode: self.search_mode,
        }
    }
}

/// Handler for search messages.
pub struct SearchSpacesHandler {
    spaces: Arc<dyn SpaceRepository>,
    synthesizer: Arc<ResponseSynthesizer>,
}

impl SearchSpacesHandler {
    pub fn new(spaces: Arc<dyn SpaceRepository>, synthesizer: Arc<ResponseSynthesizer>) -> Self {
        Self { spaces, synthesizer }
    }

    pub async fn handle(
        &self,
        cmd: SearchSpacesCommand,
        context: &[Turn],
        call: &CallContext,
    ) -> SearchSpacesResult {
        let records = match self.spaces.list_all().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    session_id = %call.session_id,
                    error = %err,
                    "space listing failed, returning empty search"
                );
                return SearchSpacesResult {
                    reply: replies::search_failed(),
                    listings: Vec::new(),
                    search_mode: SearchMode::Error,
                };
            }
        };

        let listings = search_records(&records, &cmd.message);
        tracing::info!(
            session_id = %call.session_id,
            scanned = records.len(),
            matched = listings.len(),
            "search completed"
        );

        let reply = self
            .synthesizer
            .synthesize(
                ReplyKind::SearchResults {
                    message: &cmd.message,
                    listings: &listings,
                },
                context,
                call,
            )
            .await;

        SearchSpacesResult {
            reply,
            listings,
            search_mode: SearchMode::Keyword,
        }
    }
}
