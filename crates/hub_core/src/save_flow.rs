//! Per-control save state machine.
//!
//! The machine is pure: every message yields the effects the runner must
//! execute, and each effect's outcome comes back as the next message.
use crate::{
    ChatTranscript, ControlState, ConversationItem, RequestError, SaveAck, SaveFailure,
    SaveRequest, DEFAULT_COLLECTION,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStage {
    #[default]
    Idle,
    Activating,
    Waiting,
    Scraping,
    PromptingCollection {
        transcript: ChatTranscript,
    },
    Submitting,
    Saved,
    Failed(SaveFailure),
}

impl SaveStage {
    pub fn control_state(&self) -> ControlState {
        match self {
            SaveStage::Idle => ControlState::Unsaved,
            SaveStage::Activating
            | SaveStage::Waiting
            | SaveStage::Scraping
            | SaveStage::PromptingCollection { .. }
            | SaveStage::Submitting => ControlState::Saving,
            SaveStage::Saved => ControlState::Saved,
            SaveStage::Failed(_) => ControlState::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMsg {
    /// User clicked the control.
    Clicked,
    /// The target conversation was opened.
    Activated,
    /// The settle delay after activation ran out.
    SettleElapsed,
    /// Scraper finished; `None` means no capturable content.
    Scraped(Option<ChatTranscript>),
    /// Collection prompt answered; `None` means dismissed.
    CollectionChosen(Option<String>),
    /// `save_chat` finished.
    Submitted(Result<SaveAck, RequestError>),
    /// The backend reported that it already holds this conversation.
    AlreadySaved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveEffect {
    Activate(ConversationItem),
    WaitSettle,
    Scrape,
    PromptCollection { default: String },
    Submit(SaveRequest),
    ReportSaved(SaveAck),
    ReportFailure(SaveFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFlow {
    item: ConversationItem,
    stage: SaveStage,
    default_collection: String,
}

impl SaveFlow {
    pub fn new(item: ConversationItem) -> Self {
        Self::with_default_collection(item, DEFAULT_COLLECTION)
    }

    pub fn with_default_collection(item: ConversationItem, default: impl Into<String>) -> Self {
        Self {
            item,
            stage: SaveStage::Idle,
            default_collection: default.into(),
        }
    }

    pub fn item(&self) -> &ConversationItem {
        &self.item
    }

    pub fn stage(&self) -> &SaveStage {
        &self.stage
    }

    pub fn control_state(&self) -> ControlState {
        self.stage.control_state()
    }

    pub fn last_failure(&self) -> Option<&SaveFailure> {
        match &self.stage {
            SaveStage::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Applies one message. Messages that do not belong to the current stage
    /// are dropped without effects.
    pub fn apply(&mut self, msg: SaveMsg) -> Vec<SaveEffect> {
        let stage = std::mem::take(&mut self.stage);
        let (next, effects) = match (stage, msg) {
            (stage, SaveMsg::Clicked) => {
                if stage.control_state().accepts_click() {
                    (
                        SaveStage::Activating,
                        vec![SaveEffect::Activate(self.item.clone())],
                    )
                } else {
                    (stage, Vec::new())
                }
            }
            (SaveStage::Activating, SaveMsg::Activated) => {
                (SaveStage::Waiting, vec![SaveEffect::WaitSettle])
            }
            (SaveStage::Waiting, SaveMsg::SettleElapsed) => {
                (SaveStage::Scraping, vec![SaveEffect::Scrape])
            }
            (SaveStage::Scraping, SaveMsg::Scraped(None)) => fail(SaveFailure::ScrapeEmpty),
            (SaveStage::Scraping, SaveMsg::Scraped(Some(transcript))) => (
                SaveStage::PromptingCollection { transcript },
                vec![SaveEffect::PromptCollection {
                    default: self.default_collection.clone(),
                }],
            ),
            (SaveStage::PromptingCollection { transcript }, SaveMsg::CollectionChosen(label)) => {
                match label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
                    Some(collection) => {
                        let request = SaveRequest {
                            transcript,
                            collection: collection.to_string(),
                            sidebar_title: self.item.sidebar_title(),
                        };
                        (SaveStage::Submitting, vec![SaveEffect::Submit(request)])
                    }
                    None => fail(SaveFailure::UserCancelled),
                }
            }
            (SaveStage::Submitting, SaveMsg::Submitted(Ok(ack))) => {
                (SaveStage::Saved, vec![SaveEffect::ReportSaved(ack)])
            }
            (SaveStage::Submitting, SaveMsg::Submitted(Err(err))) => {
                fail(SaveFailure::Request(err))
            }
            // Only an untouched control adopts the backend's answer; a run
            // already in flight reports its own outcome.
            (SaveStage::Idle, SaveMsg::AlreadySaved) => (SaveStage::Saved, Vec::new()),
            (stage, _) => (stage, Vec::new()),
        };
        self.stage = next;
        effects
    }
}

fn fail(failure: SaveFailure) -> (SaveStage, Vec<SaveEffect>) {
    (
        SaveStage::Failed(failure.clone()),
        vec![SaveEffect::ReportFailure(failure)],
    )
}
