use anchor_lang::prelude::*;

/// Custom error codes for the binary options markets.
///
/// Error codes are offset from 6000 (Anchor convention).
#[error_code]
pub enum BinaryOptionError {
    /// Oracle key has no live feed, is inverse-priced, or is the quote currency.
    #[msg("Invalid oracle key")]
    InvalidKey,

    /// Bidding end, maturity and expiry are out of order or out of bounds.
    #[msg("Invalid market dates")]
    InvalidDates,

    /// An opening bid is below the manager minimum.
    #[msg("Bid is below the minimum amount")]
    BidTooSmall,

    /// An opening bid is above the manager maximum.
    #[msg("Bid exceeds the maximum amount")]
    BidTooLarge,

    /// Creator's combined stake is below the capital requirement.
    #[msg("Insufficient capital")]
    InsufficientCapital,

    /// One side holds less than the skew limit of the creator's stake.
    #[msg("Bids too skewed")]
    BidsTooSkewed,

    /// Bidding window has ended.
    #[msg("Bidding is closed")]
    BiddingClosed,

    /// Options can only be claimed once bidding has ended.
    #[msg("Bidding is still open")]
    BiddingOpen,

    #[msg("Refunds are disabled for this market")]
    RefundsDisabled,

    #[msg("Market has not yet matured")]
    MarketNotYetMatured,

    #[msg("Market already resolved")]
    AlreadyResolved,

    #[msg("Market has not been resolved")]
    NotResolved,

    /// Oracle timestamp is older than maturity minus the allowed price age.
    #[msg("Oracle price is stale")]
    StalePrice,

    /// Side price left the open interval (0, 1).
    #[msg("Price out of range")]
    PriceOutOfRange,

    #[msg("Refund exceeds the current bid")]
    InsufficientBid,

    #[msg("Options already claimed")]
    AlreadyClaimed,

    #[msg("Nothing to claim")]
    NothingToClaim,

    #[msg("Nothing to exercise")]
    NothingToExercise,

    #[msg("Market has not expired")]
    MarketNotExpired,

    /// Market was destroyed by the manager and is permanently inert.
    #[msg("Market destroyed")]
    MarketDestroyed,

    #[msg("Unknown market")]
    UnknownMarket,

    /// Market is not in the active set.
    #[msg("Market is not active")]
    MarketNotActive,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Arithmetic underflow")]
    ArithmeticUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Insufficient balance")]
    InsufficientBalance,

    #[msg("Insufficient allowance")]
    InsufficientAllowance,

    #[msg("Market creation is disabled")]
    MarketCreationDisabled,

    #[msg("Manager is paused")]
    ManagerPaused,

    /// Only the manager owner (or nominee, for acceptance) may do this.
    #[msg("Unauthorized")]
    Unauthorized,

    /// Pool fee plus creator fee must stay below one.
    #[msg("Fee is too high")]
    FeeTooHigh,

    #[msg("Invalid manager configuration")]
    InvalidConfig,

    /// Recorded total deposits diverged from the sum over markets.
    #[msg("Total deposited does not match the markets")]
    TotalDepositedMismatch,
}
