/// Decimal places for grant cost, fees and cash-out amounts
pub const AMOUNT_PRECISION: u32 = 4;

/// Decimal places for valued and displayed amounts
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Basis points in one whole
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Exchange assigned to symbols provisioned on first reward
pub const DEFAULT_EXCHANGE: &str = "NSE";

/// Ledger account codes
pub const STOCK_INVENTORY_ACCOUNT_PREFIX: &str = "stock_inventory";
pub const BROKERAGE_EXPENSE_ACCOUNT: &str = "brokerage_expense";
pub const TAX_EXPENSE_ACCOUNT: &str = "tax_expense";
pub const CASH_ACCOUNT: &str = "cash";

/// Ledger memos
pub const MEMO_STOCK_INVENTORY: &str = "Rewarded stock inventory";
pub const MEMO_BROKERAGE: &str = "Brokerage charges";
pub const MEMO_TAXES: &str = "Statutory taxes";
pub const MEMO_CASH_OUTFLOW: &str = "Cash outflow for reward";
