use std::ops::{Index, IndexMut, Range};

use super::{Bitboard, Color, Move, Piece, PieceType, Square};

/// Represents just the pieces on the board using [`Bitboard`]s.
///
/// Internally, holds a bitboard representing the location of every kind of
/// piece (i.e. every combination of [`Color`] and [`PieceType`]).
///
/// These bitboards can be accessed via indexing by [`Color`] or [`Piece`].
/// For example:
/// ```
/// # use hardfiskur_core::board::{BoardRepr, Color, Piece};
/// fn foo(board_repr: &BoardRepr) {
///     println!("White king: {:?}", board_repr[Piece::WHITE_KING]);
///     println!("Black bishops: {:?}", board_repr[Piece::BLACK_BISHOP]);
///     println!("All white pieces: {:?}", board_repr[Color::White]);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardRepr {
    // Repr:
    // 0: All white pieces
    // 1: White pawns
    // 2: White knights
    // 3. White bishops
    // 4. White rooks
    // 5. White queens
    // 6. White kings
    // 7. (unused)
    // 8. All black pieces
    // 9-14: Black piece boards (see above)
    boards: [Bitboard; 15],
}

impl BoardRepr {
    const WHITE_RANGE: Range<usize> = 1..7;
    const BLACK_RANGE: Range<usize> = 9..15;

    /// Creates a new [`BoardRepr`] from the provided board state.
    ///
    /// The provided board state should be a slice of [`Option<Piece>`]s,
    /// ordered by increasing file and then rank (i.e. index 0 is a1, index 1 is
    /// b1, index 2 is c1... index 7 is h1, index 8 is a2, index 9 is b2, etc.).
    ///
    /// The provided slice is expected to be of length 64, but if a longer slice
    /// is passed this method will ignore any pieces past index 63, and if a
    /// shorter slice is passed the missing squares are assumed to be empty.
    pub fn new(board: &[Option<Piece>]) -> Self {
        let mut repr = Self::default();

        for (i, &piece) in board.iter().take(64).enumerate() {
            if let Some(piece) = piece {
                let square = Square::from_index_unchecked(i);
                repr[piece].set(square);
                repr[piece.color()].set(square);

                // TODO: Update Zobrist hash
            }
        }

        repr
    }

    /// Returns the piece, if any, on the provided square.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = Bitboard::from_square(square);

        for i in Self::WHITE_RANGE.chain(Self::BLACK_RANGE) {
            if (mask & self.boards[i]).has_piece() {
                return Piece::try_from_u8(i as u8);
            }
        }

        None
    }

    /// Returns the piece with the specified color, if any, on the provided
    /// square.
    ///
    /// This is a slightly more optimised version of [`Self::piece_at`] if you
    /// already know the color the piece has.
    pub fn piece_with_color_at(&self, color: Color, square: Square) -> Option<Piece> {
        let range = match color {
            Color::White => Self::WHITE_RANGE,
            Color::Black => Self::BLACK_RANGE,
        };
        let mask = Bitboard::from_square(square);

        for i in range {
            if (mask & self.boards[i]).has_piece() {
                return Piece::try_from_u8(i as u8);
            }
        }

        None
    }

    /// Returns a tuple (white count, black count) of the provided piece type.
    pub fn piece_count(&self, piece_type: PieceType) -> (u32, u32) {
        (
            self[piece_type.white()].pop_count(),
            self[piece_type.black()].pop_count(),
        )
    }

    /// Returns a bitboard containing all squares that have a piece on them.
    pub fn occupied(&self) -> Bitboard {
        self[Color::White] | self[Color::Black]
    }

    /// Returns a bitboard containning all squares that do not have a piece on
    /// them.
    pub fn empty(&self) -> Bitboard {
        !self.occupied()
    }

    /// Returns an iterator over bitboards for all possible [`Piece`]s.
    pub fn boards(&self) -> impl Iterator<Item = (Piece, Bitboard)> + '_ {
        Self::WHITE_RANGE
            .chain(Self::BLACK_RANGE)
            .map(move |i| (Piece::try_from_u8(i as u8).unwrap(), self.boards[i]))
    }

    /// Returns an iterator for all [`Piece`]s and their corresponding
    /// [`Square`]s.
    ///
    /// Note that the pieces are not necessarily returned in ascending order of
    /// squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        self.boards()
            .flat_map(|(piece, board)| board.set_squares().map(move |square| (piece, square)))
    }

    /// Returns an iterator over bitboards of the given [`Color`].
    pub fn boards_colored(&self, color: Color) -> impl Iterator<Item = (Piece, Bitboard)> + '_ {
        let range = match color {
            Color::White => Self::WHITE_RANGE,
            Color::Black => Self::BLACK_RANGE,
        };

        range.map(move |i| (Piece::try_from_u8(i as u8).unwrap(), self.boards[i]))
    }

    /// Make the provided [`Move`] on the board.
    ///
    /// No checks are performed to ensure the move is valid.
    ///
    /// This method is reversible -- to undo the move, simply call this method
    /// again with the same [`Move`], while the board state is the same as the
    /// state immediately after performing this move (i.e. if you make multiple
    /// moves and want to undo them, you must undo the latest move first and the
    /// earliest move last).
    pub fn move_unchecked(&mut self, the_move: Move) {
        let from = the_move.from_square();
        let to = the_move.to_square();
        let piece = the_move.piece();
        let color = piece.color();

        let from_bb = Bitboard::from_square(from);
        let to_bb = Bitboard::from_square(to);
        let from_to_bb = from_bb ^ to_bb;

        self[piece] ^= from_to_bb;
        self[color] ^= from_to_bb;

        // TODO: update Zobrist hash

        if the_move.is_en_passant() {
            let removed_pawn = Square::new_unchecked(from.rank(), to.file());
            let removed_pawn_bb = Bitboard::from_square(removed_pawn);

            self[PieceType::Pawn.with_color(color.flip())] ^= removed_pawn_bb;
            self[color.flip()] ^= removed_pawn_bb;

            // TODO: update Zobrist hash
        } else {
            if let Some(capture) = the_move.captured_piece() {
                self[capture] ^= to_bb;
                self[capture.color()] ^= to_bb;

                // TODO: update Zobrist hash
            }

            if let Some(promote) = the_move.promotion() {
                self[piece] ^= to_bb;
                self[promote] ^= to_bb;

                // TODO: update Zobrist hash
            }

            if the_move.is_castle() {
                let rook_from =
                    Square::new_unchecked(from.rank(), if from.file() < to.file() { 7 } else { 0 });
                let rook_to = Square::new_unchecked(from.rank(), (from.file() + to.file()) / 2);

                let rook_from_bb = Bitboard::from_square(rook_from);
                let rook_to_bb = Bitboard::from_square(rook_to);
                let rook_from_to_bb = rook_from_bb ^ rook_to_bb;

                self[PieceType::Rook.with_color(color)] ^= rook_from_to_bb;
                self[color] ^= rook_from_to_bb;

                // TODO: update Zobrist hash
            }
        }
    }
}

impl Index<Piece> for BoardRepr {
    type Output = Bitboard;

    fn index(&self, index: Piece) -> &Self::Output {
        &self.boards[index.get() as usize]
    }
}

impl Index<Color> for BoardRepr {
    type Output = Bitboard;

    fn index(&self, index: Color) -> &Self::Output {
        &self.boards[index as usize]
    }
}

impl IndexMut<Piece> for BoardRepr {
    /// Intended for internal use. Do not call this directly as you may break
    /// some internal invariants!
    fn index_mut(&mut self, index: Piece) -> &mut Self::Output {
        &mut self.boards[index.get() as usize]
    }
}

impl IndexMut<Color> for BoardRepr {
    /// Intended for internal use. Do not call this directly as you may break
    /// some internal invariants!
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self.boards[index as usize]
    }
}
