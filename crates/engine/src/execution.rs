use crate::error::EngineError;
use chrono::Utc;
use core_types::{OrderTicket, Portfolio, Position, Trade, TradeSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the symbol's position record changes when an outcome is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PositionChange {
    /// Insert or overwrite the position for (portfolio, symbol).
    Upsert(Position),
    /// Delete the position record; the sell brought it to exactly zero.
    Remove { portfolio_id: Uuid, symbol: String },
}

/// The complete effect of one executed order: the portfolio with its new
/// cash balance, the position change, and the ledger entry to append.
///
/// This is the atomic commit unit. The ledger store applies all three
/// parts together or not at all; the engine never hands out a partial one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub portfolio: Portfolio,
    pub position: PositionChange,
    pub trade: Trade,
}

/// Executes one order against a portfolio snapshot at the given price.
///
/// `position` is the caller-loaded position for `ticket.symbol`, or `None`
/// if the portfolio holds no shares of it. All validation happens before
/// any part of the outcome is built, so an `Err` guarantees untouched
/// state. On success exactly one new `Trade` is stamped with a fresh id
/// and the commit timestamp.
pub fn execute(
    portfolio: &Portfolio,
    position: Option<&Position>,
    ticket: &OrderTicket,
    price: Decimal,
) -> Result<TradeOutcome, EngineError> {
    // --- Order Validation ---
    // Zero or negative quantities are rejected rather than treated as a
    // no-op, and a non-positive price can only mean the caller fed us a
    // quote it should have refused upstream.
    if ticket.quantity <= Decimal::ZERO {
        return Err(EngineError::InvalidOrder(format!(
            "quantity must be positive, got {}",
            ticket.quantity
        )));
    }
    if price <= Decimal::ZERO {
        return Err(EngineError::InvalidOrder(format!(
            "price must be positive, got {}",
            price
        )));
    }

    let (cash_after, position_change) = match ticket.side {
        TradeSide::Buy => settle_buy(portfolio, position, ticket, price)?,
        TradeSide::Sell => settle_sell(portfolio, position, ticket, price)?,
    };

    let trade = Trade {
        id: Uuid::new_v4(),
        portfolio_id: portfolio.id,
        symbol: ticket.symbol.clone(),
        side: ticket.side,
        quantity: ticket.quantity,
        price,
        executed_at: Utc::now(),
    };

    tracing::debug!(
        symbol = %trade.symbol,
        side = %trade.side,
        quantity = %trade.quantity,
        price = %trade.price,
        cash_after = %cash_after,
        "order executed"
    );

    Ok(TradeOutcome {
        portfolio: Portfolio {
            cash: cash_after,
            ..portfolio.clone()
        },
        position: position_change,
        trade,
    })
}

/// `Decimal` arithmetic panics on overflow, so settlement math runs
/// through checked ops and maps an out-of-range result to a rejection.
fn too_large(ticket: &OrderTicket, price: Decimal) -> EngineError {
    EngineError::InvalidOrder(format!(
        "{} shares of {} at {} is too large to settle",
        ticket.quantity, ticket.symbol, price
    ))
}

/// Buy: debit the notional cost and fold the fill into the position at a
/// new quantity-weighted average price.
fn settle_buy(
    portfolio: &Portfolio,
    position: Option<&Position>,
    ticket: &OrderTicket,
    price: Decimal,
) -> Result<(Decimal, PositionChange), EngineError> {
    let cost = price
        .checked_mul(ticket.quantity)
        .ok_or_else(|| too_large(ticket, price))?;
    if portfolio.cash < cost {
        return Err(EngineError::InsufficientFunds {
            required: cost,
            available: portfolio.cash,
        });
    }
    let cash_after = portfolio.cash - cost;

    let next = match position {
        Some(held) => {
            // Weighted average across the shares already held and the fill.
            let total_quantity = held
                .quantity
                .checked_add(ticket.quantity)
                .ok_or_else(|| too_large(ticket, price))?;
            let average_price = held
                .cost_basis()
                .checked_add(cost)
                .and_then(|basis| basis.checked_div(total_quantity))
                .ok_or_else(|| too_large(ticket, price))?;
            Position {
                portfolio_id: held.portfolio_id,
                symbol: held.symbol.clone(),
                quantity: total_quantity,
                average_price,
            }
        }
        None => Position {
            portfolio_id: portfolio.id,
            symbol: ticket.symbol.clone(),
            quantity: ticket.quantity,
            average_price: price,
        },
    };

    Ok((cash_after, PositionChange::Upsert(next)))
}

/// Sell: credit the proceeds and decrement the position. The average
/// price is never touched on a sell; a remainder of exactly zero removes
/// the position record.
fn settle_sell(
    portfolio: &Portfolio,
    position: Option<&Position>,
    ticket: &OrderTicket,
    price: Decimal,
) -> Result<(Decimal, PositionChange), EngineError> {
    let held = position.ok_or_else(|| EngineError::NoSuchPosition(ticket.symbol.clone()))?;
    if held.quantity < ticket.quantity {
        return Err(EngineError::InsufficientShares {
            symbol: ticket.symbol.clone(),
            requested: ticket.quantity,
            held: held.quantity,
        });
    }

    let proceeds = price
        .checked_mul(ticket.quantity)
        .ok_or_else(|| too_large(ticket, price))?;
    let cash_after = portfolio
        .cash
        .checked_add(proceeds)
        .ok_or_else(|| too_large(ticket, price))?;
    let remaining = held.quantity - ticket.quantity;

    let change = if remaining.is_zero() {
        PositionChange::Remove {
            portfolio_id: held.portfolio_id,
            symbol: held.symbol.clone(),
        }
    } else {
        PositionChange::Upsert(Position {
            quantity: remaining,
            ..held.clone()
        })
    };

    Ok((cash_after, change))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn portfolio(cash: Decimal) -> Portfolio {
        Portfolio::new(1, cash)
    }

    fn ticket(symbol: &str, side: TradeSide, quantity: Decimal) -> OrderTicket {
        OrderTicket {
            symbol: symbol.to_string(),
            side,
            quantity,
        }
    }

    fn held(portfolio: &Portfolio, symbol: &str, quantity: Decimal, avg: Decimal) -> Position {
        Position {
            portfolio_id: portfolio.id,
            symbol: symbol.to_string(),
            quantity,
            average_price: avg,
        }
    }

    #[test]
    fn buy_debits_cash_and_opens_position() {
        let before = portfolio(dec!(10000));
        let outcome = execute(
            &before,
            None,
            &ticket("AAPL", TradeSide::Buy, dec!(10)),
            dec!(100),
        )
        .unwrap();

        assert_eq!(outcome.portfolio.cash, dec!(9000));
        assert_eq!(outcome.portfolio.id, before.id);
        match outcome.position {
            PositionChange::Upsert(p) => {
                assert_eq!(p.quantity, dec!(10));
                assert_eq!(p.average_price, dec!(100));
                assert_eq!(p.portfolio_id, before.id);
            }
            other => panic!("expected upsert, got {:?}", other),
        }
        assert_eq!(outcome.trade.side, TradeSide::Buy);
        assert_eq!(outcome.trade.total(), dec!(1000));
    }

    #[test]
    fn buy_recomputes_weighted_average() {
        let before = portfolio(dec!(9000));
        let existing = held(&before, "AAPL", dec!(10), dec!(100));
        let outcome = execute(
            &before,
            Some(&existing),
            &ticket("AAPL", TradeSide::Buy, dec!(5)),
            dec!(120),
        )
        .unwrap();

        assert_eq!(outcome.portfolio.cash, dec!(8400));
        match outcome.position {
            PositionChange::Upsert(p) => {
                assert_eq!(p.quantity, dec!(15));
                // (100*10 + 120*5) / 15
                assert_eq!(p.average_price, dec!(1600) / dec!(15));
                assert_eq!(p.average_price.round_dp(4), dec!(106.6667));
            }
            other => panic!("expected upsert, got {:?}", other),
        }
    }

    #[test]
    fn buy_beyond_cash_is_rejected_without_side_effects() {
        let before = portfolio(dec!(100));
        let result = execute(
            &before,
            None,
            &ticket("AAPL", TradeSide::Buy, dec!(10)),
            dec!(50),
        );

        match result {
            Err(EngineError::InsufficientFunds {
                required,
                available,
            }) => {
                assert_eq!(required, dec!(500));
                assert_eq!(available, dec!(100));
            }
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }
        // The snapshot we passed in is untouched.
        assert_eq!(before.cash, dec!(100));
    }

    #[test]
    fn buy_exactly_to_zero_cash_succeeds() {
        let before = portfolio(dec!(500));
        let outcome = execute(
            &before,
            None,
            &ticket("AAPL", TradeSide::Buy, dec!(10)),
            dec!(50),
        )
        .unwrap();
        assert_eq!(outcome.portfolio.cash, Decimal::ZERO);
    }

    #[test]
    fn sell_credits_proceeds_and_keeps_average_price() {
        let before = portfolio(dec!(8400));
        let existing = held(&before, "AAPL", dec!(15), dec!(1600) / dec!(15));
        let outcome = execute(
            &before,
            Some(&existing),
            &ticket("AAPL", TradeSide::Sell, dec!(5)),
            dec!(130),
        )
        .unwrap();

        assert_eq!(outcome.portfolio.cash, dec!(9050));
        match outcome.position {
            PositionChange::Upsert(p) => {
                assert_eq!(p.quantity, dec!(10));
                assert_eq!(p.average_price, existing.average_price);
            }
            other => panic!("expected upsert, got {:?}", other),
        }
    }

    #[test]
    fn sell_to_exactly_zero_removes_position() {
        let before = portfolio(dec!(8400));
        let existing = held(&before, "AAPL", dec!(15), dec!(1600) / dec!(15));
        let outcome = execute(
            &before,
            Some(&existing),
            &ticket("AAPL", TradeSide::Sell, dec!(15)),
            dec!(130),
        )
        .unwrap();

        assert_eq!(outcome.portfolio.cash, dec!(10350));
        match outcome.position {
            PositionChange::Remove {
                portfolio_id,
                symbol,
            } => {
                assert_eq!(portfolio_id, before.id);
                assert_eq!(symbol, "AAPL");
            }
            other => panic!("expected remove, got {:?}", other),
        }
    }

    #[test]
    fn sell_without_position_fails() {
        let before = portfolio(dec!(1000));
        let result = execute(
            &before,
            None,
            &ticket("TSLA", TradeSide::Sell, dec!(1)),
            dec!(200),
        );
        assert!(matches!(result, Err(EngineError::NoSuchPosition(s)) if s == "TSLA"));
    }

    #[test]
    fn oversell_fails_with_held_quantity() {
        let before = portfolio(dec!(1000));
        let existing = held(&before, "TSLA", dec!(3), dec!(200));
        let result = execute(
            &before,
            Some(&existing),
            &ticket("TSLA", TradeSide::Sell, dec!(4)),
            dec!(210),
        );
        match result {
            Err(EngineError::InsufficientShares {
                symbol,
                requested,
                held,
            }) => {
                assert_eq!(symbol, "TSLA");
                assert_eq!(requested, dec!(4));
                assert_eq!(held, dec!(3));
            }
            other => panic!("expected InsufficientShares, got {:?}", other),
        }
    }

    #[test]
    fn zero_and_negative_quantities_are_invalid() {
        let before = portfolio(dec!(1000));
        for qty in [Decimal::ZERO, dec!(-5)] {
            let result = execute(
                &before,
                None,
                &ticket("AAPL", TradeSide::Buy, qty),
                dec!(100),
            );
            assert!(matches!(result, Err(EngineError::InvalidOrder(_))));
        }
    }

    #[test]
    fn non_positive_price_is_invalid() {
        let before = portfolio(dec!(1000));
        let result = execute(
            &before,
            None,
            &ticket("AAPL", TradeSide::Buy, dec!(1)),
            Decimal::ZERO,
        );
        assert!(matches!(result, Err(EngineError::InvalidOrder(_))));
    }

    #[test]
    fn buy_whose_notional_overflows_is_rejected() {
        let before = portfolio(dec!(10000));
        let result = execute(
            &before,
            None,
            &ticket("AAPL", TradeSide::Buy, dec!(1000000000000000000000000000)),
            dec!(200),
        );
        assert!(matches!(result, Err(EngineError::InvalidOrder(_))));
        assert_eq!(before.cash, dec!(10000));
    }

    #[test]
    fn sell_whose_proceeds_overflow_is_rejected() {
        let before = portfolio(dec!(0));
        let huge = dec!(1000000000000000000000000000);
        let existing = held(&before, "AAPL", huge, dec!(1));
        let result = execute(
            &before,
            Some(&existing),
            &ticket("AAPL", TradeSide::Sell, huge),
            dec!(200),
        );
        assert!(matches!(result, Err(EngineError::InvalidOrder(_))));
    }

    #[test]
    fn sell_that_overflows_the_cash_balance_is_rejected() {
        let before = portfolio(Decimal::MAX);
        let existing = held(&before, "AAPL", dec!(1), dec!(100));
        let result = execute(
            &before,
            Some(&existing),
            &ticket("AAPL", TradeSide::Sell, dec!(1)),
            dec!(100),
        );
        assert!(matches!(result, Err(EngineError::InvalidOrder(_))));
    }

    #[test]
    fn buy_that_overflows_the_cost_basis_is_rejected() {
        let before = portfolio(dec!(1000));
        let existing = held(&before, "AAPL", dec!(1), Decimal::MAX);
        let result = execute(
            &before,
            Some(&existing),
            &ticket("AAPL", TradeSide::Buy, dec!(1)),
            dec!(100),
        );
        assert!(matches!(result, Err(EngineError::InvalidOrder(_))));
    }

    #[test]
    fn fractional_quantities_settle_exactly() {
        let before = portfolio(dec!(100));
        let outcome = execute(
            &before,
            None,
            &ticket("AAPL", TradeSide::Buy, dec!(0.5)),
            dec!(33.10),
        )
        .unwrap();
        assert_eq!(outcome.portfolio.cash, dec!(100) - dec!(16.550));
        assert_eq!(outcome.trade.total(), dec!(16.550));
    }
}
