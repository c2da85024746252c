/// Everything the popup needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupViewModel {
    /// Active collection label shown in the header.
    pub header: Option<String>,
    pub show_back: bool,
    pub search_text: String,
    pub body: PopupBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupBody {
    Loading(String),
    Error(String),
    Empty(String),
    /// Selectable collection tags.
    Tags(Vec<String>),
    /// External links to saved chats.
    Links(Vec<LinkView>),
    Answer(AnswerView),
}

impl Default for PopupBody {
    fn default() -> Self {
        PopupBody::Loading(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    /// Collection filter in effect, rendered as a badge above the answer.
    pub badge: Option<String>,
    /// Escaped answer with bold spans converted.
    pub html: String,
    /// Empty means no sources section.
    pub sources: Vec<LinkView>,
}
