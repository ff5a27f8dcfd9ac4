//! The `games` service: high score lists.

use std::fmt;

use serde_json::Value;

use crate::{
    error::ProtocolError,
    request::{decode_json, Operation, Request, Tier},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    Tripeaks,
    Memory,
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Game::Tripeaks => "tripeaks",
            Game::Memory => "memory",
        })
    }
}

/// Top list of a game, `top` between 1 and 40.
#[derive(Debug, Clone)]
pub struct GetGameTopList {
    pub game: Game,
    pub top: u8,
}

impl GetGameTopList {
    pub fn new(game: Game) -> Self {
        Self { game, top: 10 }
    }
}

impl Operation for GetGameTopList {
    type Output = Value;

    fn request(&self) -> Request {
        Request::get(Tier::READ, "games")
            .task("toplist")
            .param("type", self.game)
            .param("top", self.top)
    }

    fn decode(&self, body: &str) -> Result<Value, ProtocolError> {
        decode_json(body)
    }
}
