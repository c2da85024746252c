use crate::{PopupEffect, PopupMsg, PopupState, PopupView, SearchQuery};

/// Pure update function: applies a message to popup state and returns any effects.
pub fn update(mut state: PopupState, msg: PopupMsg) -> (PopupState, Vec<PopupEffect>) {
    let effects = match msg {
        PopupMsg::Opened => {
            state.begin_collections_load();
            vec![PopupEffect::FetchCollections]
        }
        PopupMsg::CollectionsLoaded(result) => {
            state.apply_collections(result);
            Vec::new()
        }
        PopupMsg::CollectionSelected(collection) => {
            state.show_chats(collection.clone());
            vec![PopupEffect::FetchChats { collection }]
        }
        PopupMsg::ChatsLoaded { collection, result } => {
            // Late completions for a collection the user already left are dropped.
            state.apply_chats(&collection, result);
            Vec::new()
        }
        PopupMsg::SearchInputChanged(text) => {
            let cleared = text.is_empty();
            state.set_search_input(text);
            if cleared && state.current_view() != &PopupView::Collections {
                state.show_collections();
            }
            Vec::new()
        }
        PopupMsg::SearchSubmitted => {
            let scope = state.active_collection().map(ToOwned::to_owned);
            match SearchQuery::new(state.search_input(), scope) {
                Some(query) => {
                    state.show_search(query.clone());
                    vec![PopupEffect::Search(query)]
                }
                None => Vec::new(),
            }
        }
        PopupMsg::SearchCompleted { query, result } => {
            state.apply_search(&query, result);
            Vec::new()
        }
        PopupMsg::BackClicked => {
            let leaving_search = matches!(state.current_view(), PopupView::Search { .. });
            if state.current_view() != &PopupView::Collections {
                if leaving_search {
                    state.clear_search_input();
                }
                state.show_collections();
            }
            Vec::new()
        }
    };

    (state, effects)
}
