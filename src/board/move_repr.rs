use bitflags::bitflags;

use super::{Piece, PieceType, Square};

bitflags! {
    /// Flags stored in the high bits of a packed [`Move`], for information
    /// that can't be derived from the piece fields alone.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u32 {
        const DOUBLE_PAWN_PUSH = 1 << 24;
        const EN_PASSANT       = 1 << 25;
        const CASTLE_KINGSIDE  = 1 << 26;
        const CASTLE_QUEENSIDE = 1 << 27;
    }
}

/// Which side, if any, a move castles towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    None,
    Kingside,
    Queenside,
}

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const CAPTURED_SHIFT: u32 = 16;
const PROMOTION_SHIFT: u32 = 20;

const SQUARE_MASK: u32 = 0x3F;
const PIECE_MASK: u32 = 0x0F;

/// Move data, encoded as a 32-bit integer.
///
/// ```text
/// 0000_CCEP DPMM_MMCC CCPP_PPTT TTTTFF_FFFF
/// ```
///
/// * bits 0-5: from square
/// * bits 6-11: to square
/// * bits 12-15: moved piece (colour + piece type)
/// * bits 16-19: captured piece, 0 if none
/// * bits 20-23: promoted-to piece, 0 if none
/// * bit 24: double pawn push flag
/// * bit 25: en passant flag
/// * bit 26: kingside castle flag
/// * bit 27: queenside castle flag
///
/// The colour of a move is always that of [`Self::piece`] -- there's no need
/// to track it separately since a move can only ever be made by the side to
/// move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move(u32);

impl Move {
    pub const fn new(
        from: Square,
        to: Square,
        piece: Piece,
        captured_piece: Option<Piece>,
        promotion: Option<Piece>,
        flags: MoveFlags,
    ) -> Self {
        let from = (from.get() as u32) << FROM_SHIFT;
        let to = (to.get() as u32) << TO_SHIFT;
        let piece = (piece.get() as u32) << PIECE_SHIFT;
        let captured_piece = (match captured_piece {
            Some(piece) => piece.get() as u32,
            None => 0,
        }) << CAPTURED_SHIFT;
        let promotion = (match promotion {
            Some(piece) => piece.get() as u32,
            None => 0,
        }) << PROMOTION_SHIFT;

        Self(flags.bits() | promotion | captured_piece | piece | to | from)
    }

    /// Starts building a quiet, non-special move. Use the methods on
    /// [`MoveBuilder`] to add captures, promotions, or other flags.
    pub fn builder(from: Square, to: Square, piece: Piece) -> MoveBuilder {
        MoveBuilder::new(from, to, piece)
    }

    pub const fn new_unchecked(inner: u32) -> Self {
        Self(inner)
    }

    pub const fn inner(self) -> u32 {
        self.0
    }

    pub const fn from_square(self) -> Square {
        Square::from_u8_unchecked(((self.0 >> FROM_SHIFT) & SQUARE_MASK) as u8)
    }

    pub const fn to_square(self) -> Square {
        Square::from_u8_unchecked(((self.0 >> TO_SHIFT) & SQUARE_MASK) as u8)
    }

    pub const fn piece(self) -> Piece {
        match Piece::try_from_u8(((self.0 >> PIECE_SHIFT) & PIECE_MASK) as u8) {
            Some(piece) => piece,
            None => panic!("invalid move representation encountered"),
        }
    }

    pub const fn piece_type(self) -> PieceType {
        self.piece().piece_type()
    }

    pub const fn captured_piece(self) -> Option<Piece> {
        Piece::try_from_u8(((self.0 >> CAPTURED_SHIFT) & PIECE_MASK) as u8)
    }

    pub const fn promotion(self) -> Option<Piece> {
        Piece::try_from_u8(((self.0 >> PROMOTION_SHIFT) & PIECE_MASK) as u8)
    }

    pub const fn flags(self) -> MoveFlags {
        MoveFlags::from_bits_truncate(self.0)
    }

    pub const fn is_capture(self) -> bool {
        self.captured_piece().is_some()
    }

    pub const fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    pub const fn is_double_pawn_push(self) -> bool {
        self.flags().contains(MoveFlags::DOUBLE_PAWN_PUSH)
    }

    pub const fn is_en_passant(self) -> bool {
        self.flags().contains(MoveFlags::EN_PASSANT)
    }

    pub const fn is_castle(self) -> bool {
        self.flags()
            .intersects(MoveFlags::CASTLE_KINGSIDE.union(MoveFlags::CASTLE_QUEENSIDE))
    }

    pub const fn castle_side(self) -> CastleSide {
        let flags = self.flags();
        if flags.contains(MoveFlags::CASTLE_KINGSIDE) {
            CastleSide::Kingside
        } else if flags.contains(MoveFlags::CASTLE_QUEENSIDE) {
            CastleSide::Queenside
        } else {
            CastleSide::None
        }
    }

    /// True if this move is not a capture, promotion, castle, or en passant.
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion() && !self.is_castle()
    }

    pub fn is_move_of(self, piece_type: PieceType) -> bool {
        self.piece().piece_type() == piece_type
    }

    pub fn is_capture_of(self, piece_type: PieceType) -> bool {
        matches!(self.captured_piece(), Some(piece) if piece.piece_type() == piece_type)
    }

    /// True if this move is "reversible" for the purposes of threefold
    /// repetition detection, i.e. it is neither a pawn move nor a capture.
    pub fn is_reversible(self) -> bool {
        !self.is_capture() && !self.is_move_of(PieceType::Pawn)
    }
}

impl std::fmt::Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Move")
            .field("from", &self.from_square())
            .field("to", &self.to_square())
            .field("piece", &self.piece())
            .field("captured_piece", &self.captured_piece())
            .field("promotion", &self.promotion())
            .field("castle_side", &self.castle_side())
            .field("is_double_pawn_push", &self.is_double_pawn_push())
            .field("is_en_passant", &self.is_en_passant())
            .finish()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from_square(), self.to_square())?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{}", promotion.piece_type().as_lowercase_char())?;
        }
        Ok(())
    }
}

/// Builder for constructing [`Move`]s, see [`Move::builder`].
#[derive(Debug, Clone, Copy)]
pub struct MoveBuilder {
    from: Square,
    to: Square,
    piece: Piece,
    captured_piece: Option<Piece>,
    promotion: Option<Piece>,
    flags: MoveFlags,
}

impl MoveBuilder {
    pub fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            captured_piece: None,
            promotion: None,
            flags: MoveFlags::empty(),
        }
    }

    pub fn captures(mut self, captured_piece: Piece) -> Self {
        self.captured_piece = Some(captured_piece);
        self
    }

    pub fn promotes_to(mut self, promotion: PieceType) -> Self {
        self.promotion = Some(promotion.with_color(self.piece.color()));
        self
    }

    pub fn is_double_pawn_push(mut self) -> Self {
        self.flags |= MoveFlags::DOUBLE_PAWN_PUSH;
        self
    }

    pub fn is_en_passant(mut self) -> Self {
        self.flags |= MoveFlags::EN_PASSANT;
        self
    }

    /// Marks this move as a castle, inferring the side from whether `to` is
    /// east or west of `from`. Prefer [`Self::is_castle_kingside`] or
    /// [`Self::is_castle_queenside`] when the side is already known.
    pub fn is_castle(mut self) -> Self {
        if self.to.file() > self.from.file() {
            self.flags |= MoveFlags::CASTLE_KINGSIDE;
        } else {
            self.flags |= MoveFlags::CASTLE_QUEENSIDE;
        }
        self
    }

    pub fn is_castle_kingside(mut self) -> Self {
        self.flags |= MoveFlags::CASTLE_KINGSIDE;
        self
    }

    pub fn is_castle_queenside(mut self) -> Self {
        self.flags |= MoveFlags::CASTLE_QUEENSIDE;
        self
    }

    pub const fn build(self) -> Move {
        Move::new(
            self.from,
            self.to,
            self.piece,
            self.captured_piece,
            self.promotion,
            self.flags,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_quiet_move() {
        let m = Move::builder(Square::E2, Square::E4, Piece::WHITE_PAWN)
            .is_double_pawn_push()
            .build();

        assert_eq!(m.from_square(), Square::E2);
        assert_eq!(m.to_square(), Square::E4);
        assert_eq!(m.piece(), Piece::WHITE_PAWN);
        assert_eq!(m.captured_piece(), None);
        assert_eq!(m.promotion(), None);
        assert!(m.is_double_pawn_push());
        assert!(!m.is_capture());
        assert!(m.is_quiet());
    }

    #[test]
    fn round_trips_capture_promotion() {
        let m = Move::builder(Square::B7, Square::A8, Piece::WHITE_PAWN)
            .captures(Piece::BLACK_ROOK)
            .promotes_to(PieceType::Queen)
            .build();

        assert_eq!(m.captured_piece(), Some(Piece::BLACK_ROOK));
        assert_eq!(m.promotion(), Some(Piece::WHITE_QUEEN));
        assert!(m.is_capture());
        assert!(m.is_promotion());
        assert!(!m.is_quiet());
    }

    #[test]
    fn castle_side_is_distinguishable() {
        let kingside = Move::builder(Square::E1, Square::G1, Piece::WHITE_KING)
            .is_castle_kingside()
            .build();
        let queenside = Move::builder(Square::E1, Square::C1, Piece::WHITE_KING)
            .is_castle_queenside()
            .build();

        assert_eq!(kingside.castle_side(), CastleSide::Kingside);
        assert_eq!(queenside.castle_side(), CastleSide::Queenside);
        assert!(kingside.is_castle());
        assert!(queenside.is_castle());
    }

    #[test]
    fn is_castle_infers_side_from_destination() {
        let kingside = Move::builder(Square::E8, Square::G8, Piece::BLACK_KING)
            .is_castle()
            .build();
        let queenside = Move::builder(Square::E8, Square::C8, Piece::BLACK_KING)
            .is_castle()
            .build();

        assert_eq!(kingside.castle_side(), CastleSide::Kingside);
        assert_eq!(queenside.castle_side(), CastleSide::Queenside);
    }

    #[test]
    fn is_reversible() {
        let quiet_knight = Move::builder(Square::B1, Square::C3, Piece::WHITE_KNIGHT).build();
        let pawn_push = Move::builder(Square::E2, Square::E3, Piece::WHITE_PAWN).build();
        let capture = Move::builder(Square::D1, Square::D8, Piece::WHITE_QUEEN)
            .captures(Piece::BLACK_QUEEN)
            .build();

        assert!(quiet_knight.is_reversible());
        assert!(!pawn_push.is_reversible());
        assert!(!capture.is_reversible());
    }

    #[test]
    fn display_formats_as_long_algebraic() {
        let m = Move::builder(Square::E2, Square::E4, Piece::WHITE_PAWN)
            .is_double_pawn_push()
            .build();
        assert_eq!(m.to_string(), "e2e4");

        let promo = Move::builder(Square::B7, Square::A8, Piece::WHITE_PAWN)
            .captures(Piece::BLACK_ROOK)
            .promotes_to(PieceType::Queen)
            .build();
        assert_eq!(promo.to_string(), "b7a8q");
    }
}
