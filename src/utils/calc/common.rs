use crate::{
    common::{LaunchError, LaunchResult},
    constants::trade::BASIS_POINTS_DENOMINATOR,
};

/// Calculate buy amount with slippage protection
/// Add slippage percentage to the amount so the buy still lands if the curve moves
///
/// # Parameters
/// * `amount` - Lamports the buy is expected to cost
/// * `basis_points` - Slippage basis points, 1 basis point = 0.01%
///
/// # Examples
/// * basis_points = 100  -> 1% slippage
/// * basis_points = 500  -> 5% slippage
/// * basis_points = 1000 -> 10% slippage
pub fn calculate_with_slippage_buy(amount: u64, basis_points: u64) -> LaunchResult<u64> {
    let amount = amount as u128;
    let padded = amount + amount * basis_points as u128 / BASIS_POINTS_DENOMINATOR as u128;
    u64::try_from(padded).map_err(|_| LaunchError::QuantityOverflow("max sol cost"))
}
