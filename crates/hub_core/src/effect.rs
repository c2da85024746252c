use crate::SearchQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEffect {
    FetchCollections,
    FetchChats { collection: String },
    Search(SearchQuery),
}
