use log::{debug, info};

use crate::board::{Board, Color, PieceKind};
use crate::error::GameError;
use crate::executor::{MoveOutcome, PromoteTo, PromotionChooser};
use crate::geometry::Location;
use crate::movegen::legal_destinations;
use crate::status::{checkmated_color, draw, DrawKind};

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOptions {
    /// What a pawn becomes when no chooser is supplied.
    pub default_promotion: PieceKind,
    /// First ply at which resigning and offering a draw are allowed.
    pub options_unlock_ply: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            default_promotion: PieceKind::Queen,
            options_unlock_ply: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    Checkmate { winner: Color },
    Draw(DrawKind),
    Resigned { winner: Color },
    DrawAgreed,
}

impl GameResult {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameResult::Ongoing)
    }

    /// Results that follow from the position alone and can be undone.
    fn from_position(board: &Board) -> GameResult {
        if let Some(mated) = checkmated_color(board) {
            GameResult::Checkmate { winner: mated.opposite() }
        } else if let Some(kind) = draw(board) {
            GameResult::Draw(kind)
        } else {
            GameResult::Ongoing
        }
    }
}

/// A two-player game: a board plus selection, draw offers and the result.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    options: GameOptions,
    selected: Option<Location>,
    draw_offer: Option<Color>,
    result: GameResult,
}

impl Game {
    pub fn new() -> Self {
        Self::with_options(GameOptions::default())
    }

    pub fn with_options(options: GameOptions) -> Self {
        Self::from_board(Board::new(), options)
    }

    pub fn from_board(board: Board, options: GameOptions) -> Self {
        let result = GameResult::from_position(&board);
        Self {
            board,
            options,
            selected: None,
            draw_offer: None,
            result,
        }
    }

    /// Resumes a game from snapshot text.
    pub fn from_snapshot_text(text: &str, options: GameOptions) -> Result<Self, GameError> {
        let board = Board::decode(text)?;
        Ok(Self::from_board(board, options))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn selected(&self) -> Option<Location> {
        self.selected
    }

    /// The side whose draw offer is waiting for an answer.
    pub fn draw_offered_by(&self) -> Option<Color> {
        self.draw_offer
    }

    pub fn color_to_move(&self) -> Color {
        self.board.color_to_move()
    }

    pub fn legal_destinations(&self, from: Location) -> Vec<Location> {
        legal_destinations(&self.board, from)
    }

    /// Picks up one of the mover's pieces and returns where it may go.
    pub fn select(&mut self, at: Location) -> Result<Vec<Location>, GameError> {
        self.ensure_ongoing()?;
        let piece = self.board.piece_at(at).ok_or(GameError::EmptySquare(at))?;
        if piece.color != self.board.color_to_move() {
            return Err(GameError::NotYourTurn(at));
        }
        self.selected = Some(at);
        Ok(self.legal_destinations(at))
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Moves the selected piece. The selection is cleared either way.
    pub fn move_selected(&mut self, to: Location) -> Result<MoveOutcome, GameError> {
        let from = self.selected.take().ok_or(GameError::NoPieceSelected)?;
        self.play(from, to)
    }

    pub fn play(&mut self, from: Location, to: Location) -> Result<MoveOutcome, GameError> {
        let mut fallback = PromoteTo(self.options.default_promotion);
        self.play_with(from, to, &mut fallback)
    }

    pub fn play_with(
        &mut self,
        from: Location,
        to: Location,
        chooser: &mut dyn PromotionChooser,
    ) -> Result<MoveOutcome, GameError> {
        self.ensure_ongoing()?;
        let outcome = self.board.apply_move(from, to, Some(chooser));
        if let MoveOutcome::Applied(applied) = &outcome {
            self.selected = None;
            if self.draw_offer == Some(applied.color.opposite()) {
                debug!("{} declined the draw by moving", applied.color);
                self.draw_offer = None;
            }
            self.result = match (applied.checkmate_after, applied.draw_after) {
                (Some(mated), _) => GameResult::Checkmate { winner: mated.opposite() },
                (None, Some(kind)) => GameResult::Draw(kind),
                (None, None) => GameResult::Ongoing,
            };
            if self.result.is_over() {
                info!("game over at ply {}: {:?}", self.board.ply(), self.result);
            }
        }
        Ok(outcome)
    }

    /// Takes back the last move. Positional results are recomputed; a
    /// resignation or agreed draw cannot be taken back.
    pub fn undo(&mut self) -> Result<(), GameError> {
        if matches!(self.result, GameResult::Resigned { .. } | GameResult::DrawAgreed) {
            return Err(GameError::GameOver);
        }
        if !self.board.undo_move() {
            return Err(GameError::NothingToUndo);
        }
        self.selected = None;
        self.draw_offer = None;
        self.result = GameResult::from_position(&self.board);
        Ok(())
    }

    /// The side to move gives up.
    pub fn resign(&mut self) -> Result<GameResult, GameError> {
        self.ensure_ongoing()?;
        self.ensure_unlocked()?;
        let loser = self.board.color_to_move();
        self.result = GameResult::Resigned { winner: loser.opposite() };
        info!("{} resigned at ply {}", loser, self.board.ply());
        Ok(self.result)
    }

    /// The side that just moved offers a draw to the side to move.
    pub fn offer_draw(&mut self) -> Result<(), GameError> {
        self.ensure_ongoing()?;
        self.ensure_unlocked()?;
        let offering = self.board.color_to_move().opposite();
        self.draw_offer = Some(offering);
        debug!("{} offers a draw", offering);
        Ok(())
    }

    pub fn accept_draw(&mut self) -> Result<GameResult, GameError> {
        self.ensure_ongoing()?;
        if self.draw_offer.take().is_none() {
            return Err(GameError::NoDrawOffer);
        }
        self.result = GameResult::DrawAgreed;
        info!("draw agreed at ply {}", self.board.ply());
        Ok(self.result)
    }

    pub fn decline_draw(&mut self) -> Result<(), GameError> {
        self.draw_offer.take().map(|_| ()).ok_or(GameError::NoDrawOffer)
    }

    pub fn snapshot_text(&self) -> Result<String, GameError> {
        Ok(self.board.encode()?)
    }

    fn ensure_ongoing(&self) -> Result<(), GameError> {
        if self.result.is_over() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<(), GameError> {
        let ply = self.board.ply();
        let required = self.options.options_unlock_ply;
        if ply < required {
            return Err(GameError::OptionUnavailable { ply, required });
        }
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
