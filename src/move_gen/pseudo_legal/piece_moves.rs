use crate::{
    board::{Move, PieceType},
    move_gen::{MoveGenMasks, MoveGenerator},
};

impl<'board, 'moves> MoveGenerator<'board, 'moves> {
    pub(in crate::move_gen) fn pseudo_legal_knight_moves(&mut self, masks: &MoveGenMasks) {
        let piece = PieceType::Knight.with_color(self.to_move);
        let movable_knights = self.board[piece] & masks.movable;

        let pushable_squares = self.empty & masks.push;
        let capturable_pieces = self.board[self.to_move.flip()] & masks.capture;

        for from in movable_knights.squares() {
            let attacks = self.lookups.get_knight_moves(from);

            for to in (attacks & pushable_squares).squares() {
                self.out_moves.push(Move::builder(from, to, piece).build());
            }

            for to in (attacks & capturable_pieces).squares() {
                self.out_moves.push(
                    Move::builder(from, to, piece)
                        .captures(
                            self.board
                                .piece_with_color_at(self.to_move.flip(), to)
                                .unwrap(),
                        )
                        .build(),
                );
            }
        }
    }

    pub(in crate::move_gen) fn pseudo_legal_bishop_moves(&mut self, masks: &MoveGenMasks) {
        self.pseudo_legal_sliding_moves(PieceType::Bishop, masks, |this, from| {
            this.lookups.get_bishop_attacks(this.occupied, from)
        });
    }

    pub(in crate::move_gen) fn pseudo_legal_rook_moves(&mut self, masks: &MoveGenMasks) {
        self.pseudo_legal_sliding_moves(PieceType::Rook, masks, |this, from| {
            this.lookups.get_rook_attacks(this.occupied, from)
        });
    }

    pub(in crate::move_gen) fn pseudo_legal_queen_moves(&mut self, masks: &MoveGenMasks) {
        self.pseudo_legal_sliding_moves(PieceType::Queen, masks, |this, from| {
            this.lookups.get_bishop_attacks(this.occupied, from)
                | this.lookups.get_rook_attacks(this.occupied, from)
        });
    }

    fn pseudo_legal_sliding_moves(
        &mut self,
        piece_type: PieceType,
        masks: &MoveGenMasks,
        attacks_from: impl Fn(&Self, crate::board::Square) -> crate::board::Bitboard,
    ) {
        let piece = piece_type.with_color(self.to_move);
        let movable_pieces = self.board[piece] & masks.movable;

        let pushable_squares = self.empty & masks.push;
        let capturable_pieces = self.board[self.to_move.flip()] & masks.capture;

        for from in movable_pieces.squares() {
            let attacks = attacks_from(self, from);

            for to in (attacks & pushable_squares).squares() {
                self.out_moves.push(Move::builder(from, to, piece).build());
            }

            for to in (attacks & capturable_pieces).squares() {
                self.out_moves.push(
                    Move::builder(from, to, piece)
                        .captures(
                            self.board
                                .piece_with_color_at(self.to_move.flip(), to)
                                .unwrap(),
                        )
                        .build(),
                );
            }
        }
    }
}
