use crate::{ChatSummary, RequestError, SearchQuery, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupMsg {
    /// Popup was opened; triggers the collection fetch.
    Opened,
    CollectionsLoaded(Result<Vec<String>, RequestError>),
    /// User picked a collection tag.
    CollectionSelected(String),
    ChatsLoaded {
        collection: String,
        result: Result<Vec<ChatSummary>, RequestError>,
    },
    /// User edited the search field.
    SearchInputChanged(String),
    /// User pressed Enter in the search field.
    SearchSubmitted,
    SearchCompleted {
        query: SearchQuery,
        result: Result<SearchResult, RequestError>,
    },
    /// User clicked the back control.
    BackClicked,
}
