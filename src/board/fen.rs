use thiserror::Error;

use super::{Board, Castling, Color, Piece, Square};

impl Board {
    /// Parses a [`Board`] from Forsyth-Edwards Notation.
    ///
    /// Returns an error describing which field of the FEN string was
    /// malformed, rather than just `None`, so callers (e.g. a UCI `position
    /// fen ...` handler) can report something useful to the user.
    pub fn try_parse_fen(fen: &str) -> Result<Self, FenParseError> {
        try_parse_fen(fen)
    }

    /// Serialises this position to Forsyth-Edwards Notation.
    pub fn to_fen(&self) -> String {
        board_to_fen(self)
    }
}

/// Describes why a FEN string failed to parse, identifying which of the six
/// space-separated fields was at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenParseError {
    #[error("expected 6 space-separated fields, found {0}")]
    WrongFieldCount(usize),
    #[error("expected 8 ranks in piece placement field, found {0}")]
    WrongRankCount(usize),
    #[error("invalid piece character {0:?} in piece placement field")]
    InvalidPieceChar(char),
    #[error("rank {0} has too many squares")]
    RankOverflow(u8),
    #[error("invalid side to move {0:?}, expected \"w\" or \"b\"")]
    InvalidSideToMove(String),
    #[error("invalid castling rights character {0:?}")]
    InvalidCastlingRights(char),
    #[error("invalid en passant target square {0:?}")]
    InvalidEnPassantSquare(String),
    #[error("invalid halfmove clock {0:?}")]
    InvalidHalfmoveClock(String),
    #[error("invalid fullmove number {0:?}")]
    InvalidFullmoves(String),
}

pub fn board_to_fen(board: &Board) -> String {
    let mut result = String::new();

    for rank in (0..8).rev() {
        let mut empty_squares = 0;
        for file in 0..8 {
            let square = Square::new_unchecked(rank, file);
            match board.board.piece_at(square) {
                None => empty_squares += 1,
                Some(piece) => {
                    if empty_squares > 0 {
                        result.push((empty_squares + b'0') as _);
                    }
                    result.push(piece.as_fen_char());
                    empty_squares = 0;
                }
            }
        }
        if empty_squares > 0 {
            result.push((empty_squares + b'0') as _);
        }
        if rank > 0 {
            result.push('/');
        }
    }

    result.push(' ');
    result.push(if board.to_move.is_white() { 'w' } else { 'b' });
    result.push(' ');
    result.push_str(&board.castling.as_fen_str());
    result.push(' ');
    match board.en_passant {
        Some(square) => result.push_str(&square.to_string()),
        None => result.push('-'),
    };

    result.push(' ');
    result.push_str(&board.halfmove_clock.to_string());
    result.push(' ');
    result.push_str(&board.fullmoves.to_string());

    result
}

pub fn try_parse_fen(fen: &str) -> Result<Board, FenParseError> {
    let fields: Vec<_> = fen.split(' ').filter(|s| !s.is_empty()).collect();
    if fields.len() != 6 {
        return Err(FenParseError::WrongFieldCount(fields.len()));
    }
    let placement = fields[0];
    let to_move = fields[1];
    let castling = fields[2];
    let en_passant = fields[3];
    let halfmove_clock = fields[4];
    let fullmoves = fields[5];

    let ranks: Vec<_> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenParseError::WrongRankCount(ranks.len()));
    }

    let mut board = [None; 64];
    for (rank_index, rank_pieces) in ranks.into_iter().enumerate() {
        let rank = 7 - rank_index as u8;
        let mut file: u8 = 0;
        for char in rank_pieces.chars() {
            if char.is_ascii_digit() {
                let digit = (char as u8) - b'0';
                file += digit;
            } else {
                let piece = Piece::try_from_fen_char(char)
                    .ok_or(FenParseError::InvalidPieceChar(char))?;
                if file >= 8 {
                    return Err(FenParseError::RankOverflow(rank));
                }
                let index = Square::new_unchecked(rank, file).index();
                board[index] = Some(piece);

                file += 1
            }

            if file > 8 {
                return Err(FenParseError::RankOverflow(rank));
            }
        }
    }

    let to_move = match to_move {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenParseError::InvalidSideToMove(other.to_string())),
    };

    let castling = if castling == "-" {
        Castling::empty()
    } else {
        let mut flags = Castling::empty();
        for c in castling.chars() {
            match c {
                'K' => flags |= Castling::WHITE_KINGSIDE,
                'Q' => flags |= Castling::WHITE_QUEENSIDE,
                'k' => flags |= Castling::BLACK_KINGSIDE,
                'q' => flags |= Castling::BLACK_QUEENSIDE,
                other => return Err(FenParseError::InvalidCastlingRights(other)),
            }
        }
        flags
    };

    let en_passant = if en_passant == "-" {
        None
    } else {
        Some(
            en_passant
                .parse()
                .map_err(|_| FenParseError::InvalidEnPassantSquare(en_passant.to_string()))?,
        )
    };

    let halfmove_clock = halfmove_clock
        .parse()
        .map_err(|_| FenParseError::InvalidHalfmoveClock(halfmove_clock.to_string()))?;
    let fullmoves = fullmoves
        .parse()
        .map_err(|_| FenParseError::InvalidFullmoves(fullmoves.to_string()))?;

    Ok(Board::new(
        &board,
        to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmoves,
    ))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_starting_position() {
        let board =
            Board::try_parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();

        assert_eq!(board.to_move(), Color::White);
        assert_eq!(
            board.castling(),
            Castling::WHITE_KINGSIDE
                | Castling::WHITE_QUEENSIDE
                | Castling::BLACK_KINGSIDE
                | Castling::BLACK_QUEENSIDE
        );
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmoves(), 1);
    }

    #[test]
    fn round_trips_through_fen() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 7";
        let board = Board::try_parse_fen(fen).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            Board::try_parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(FenParseError::WrongFieldCount(5))
        );
    }

    #[test]
    fn rejects_wrong_rank_count() {
        assert_eq!(
            Board::try_parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1"),
            Err(FenParseError::WrongRankCount(7))
        );
    }

    #[test]
    fn rejects_invalid_piece_char() {
        assert_eq!(
            Board::try_parse_fen("rnbqkbnx/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenParseError::InvalidPieceChar('x'))
        );
    }

    #[test]
    fn rejects_invalid_side_to_move() {
        assert_eq!(
            Board::try_parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenParseError::InvalidSideToMove("x".to_string()))
        );
    }
}
