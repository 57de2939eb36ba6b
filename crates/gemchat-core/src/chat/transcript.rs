use gemchat_types::chat::ChatTurn;

/// Ordered chat turns of one session.
///
/// Order equals submission order. Turns are never removed or edited.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn all(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
