//! The concrete [`ParamKind`](esi_optimizer::ParamKind) values a
//! [`crate::fit_model::FitModelOnPoints`] understands.

use esi_optimizer::ParamKind;

pub const TRANSLATION_X: ParamKind = ParamKind(0);
pub const TRANSLATION_Y: ParamKind = ParamKind(1);
pub const TRANSLATION_Z: ParamKind = ParamKind(2);
pub const SCALE: ParamKind = ParamKind(3);
pub const SCALE_X: ParamKind = ParamKind(4);
pub const SCALE_Y: ParamKind = ParamKind(5);
pub const SCALE_Z: ParamKind = ParamKind(6);
pub const ROTATION_X: ParamKind = ParamKind(7);
pub const ROTATION_Y: ParamKind = ParamKind(8);
pub const ROTATION_Z: ParamKind = ParamKind(9);
pub const SINUS_PINCH_Y_TO_X: ParamKind = ParamKind(10);
pub const SINUS_PINCH_Y_TO_Z: ParamKind = ParamKind(11);
pub const FLATTEN_Y_POS: ParamKind = ParamKind(12);
pub const FLATTEN_Y_NEG: ParamKind = ParamKind(13);
pub const FLATTEN_Z_POS: ParamKind = ParamKind(14);
pub const FLATTEN_X: ParamKind = ParamKind(15);
