use super::{MoveGenMasks, MoveGenerator};

mod pawn_moves;
mod piece_moves;

impl<'board, 'moves> MoveGenerator<'board, 'moves> {
    fn pseudo_legal_moves(&mut self, masks: &MoveGenMasks) {
        self.pseudo_legal_pawn_moves(masks);
        self.pseudo_legal_knight_moves(masks);
        self.pseudo_legal_bishop_moves(masks);
        self.pseudo_legal_rook_moves(masks);
        self.pseudo_legal_queen_moves(masks);
    }
}
