use std::{
    fmt::{Display, Write},
    str::FromStr,
};

use thiserror::Error;

use super::{Move, Piece, PieceType, Square};

/// Utility type representing a move as used in the Universal Chess Interface
/// (UCI).
///
/// This type is intended for parsing the move format used in UCI, which simply
/// specifies the start and end squares as well as optional promotion. Some
/// examples are:
///
/// * `e2e4`
/// * `e7e5`
/// * `e1g1` (white short castling)
/// * `e7e8q` (for promotion)
///
/// This is sometimes called long algebraic notation, but long algebraic
/// notation may have additional information than required by UCI, e.g. the
/// piece being moved, captures etc.
///
/// ```
/// # use hardfiskur_core::board::{UCIMove, Square};
/// assert_eq!(
///     "e2e4".parse(),
///     Ok(UCIMove {
///         from: Square::E2,
///         to: Square::E4,
///         promotion: None,
///     })
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UCIMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Display for UCIMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.from.fmt(f)?;
        self.to.fmt(f)?;
        if let Some(promotion) = self.promotion {
            f.write_char(promotion.as_lowercase_char())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseUCIMoveError {
    #[error("Expected 4 or 5 characters")]
    IncorrectLength,
    #[error("Invalid square {0}")]
    InvalidSquare(String),
    #[error("Invalid promo target")]
    InvalidPromoTarget(char),
}

impl FromStr for UCIMove {
    type Err = ParseUCIMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = s.chars().collect::<Vec<_>>();
        if chars.len() != 4 && chars.len() != 5 {
            return Err(ParseUCIMoveError::IncorrectLength);
        }

        let from_str = String::from_iter(&chars[0..2]);
        let from = from_str
            .parse()
            .map_err(|_| ParseUCIMoveError::InvalidSquare(from_str))?;

        let to_str = String::from_iter(&chars[2..4]);
        let to = to_str
            .parse()
            .map_err(|_| ParseUCIMoveError::InvalidSquare(to_str))?;

        let promotion = match chars.get(4) {
            Some(&c) => Some(
                Piece::try_from_fen_char(c)
                    .ok_or(ParseUCIMoveError::InvalidPromoTarget(c))?
                    .piece_type(),
            ),
            None => None,
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl From<Move> for UCIMove {
    fn from(value: Move) -> Self {
        Self {
            from: value.from_square(),
            to: value.to_square(),
            promotion: value.promotion().map(|p| p.piece_type()),
        }
    }
}
