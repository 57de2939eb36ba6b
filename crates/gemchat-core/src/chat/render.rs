//! Turn renderer: projects a transcript into role-tagged display blocks.

use serde::Serialize;

use gemchat_types::chat::{ChatTurn, TurnRole};

/// One chat bubble as shown in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTurn {
    pub role: TurnRole,
    pub avatar: &'static str,
    pub content: String,
}

/// Avatar shown next to a bubble of the given role.
pub fn avatar_for(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "🧑",
        TurnRole::Assistant => "🤖",
    }
}

/// One block per turn, in transcript order.
pub fn render_transcript(turns: &[ChatTurn]) -> Vec<RenderedTurn> {
    turns
        .iter()
        .map(|turn| RenderedTurn {
            role: turn.role,
            avatar: avatar_for(turn.role),
            content: turn.content.clone(),
        })
        .collect()
}
