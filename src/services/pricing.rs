use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Client, Service};

#[derive(Debug, Clone, Serialize)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub discount_percent: i32,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

// Half-cent amounts round to the nearest even cent (ROUND_HALF_EVEN).
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

pub fn calculate_price(services: &[Service], client: &Client) -> PriceBreakdown {
    let discount_percent = if client.is_regular && client.discount_percent > 0 {
        client.discount_percent
    } else {
        0
    };
    breakdown(services, discount_percent)
}

pub fn quote(
    services: &[Service],
    is_regular: bool,
    default_discount_percent: i32,
) -> PriceBreakdown {
    let discount_percent = if is_regular { default_discount_percent } else { 0 };
    breakdown(services, discount_percent)
}

fn breakdown(services: &[Service], discount_percent: i32) -> PriceBreakdown {
    let base_price: Decimal = services.iter().map(|s| s.price).sum();
    let discount_amount = if discount_percent > 0 {
        round_money(
            base_price * Decimal::from(discount_percent) / Decimal::from(100),
            2,
        )
    } else {
        Decimal::ZERO
    };
    let final_price = base_price - discount_amount;

    PriceBreakdown {
        base_price,
        discount_percent,
        discount_amount,
        final_price,
    }
}
