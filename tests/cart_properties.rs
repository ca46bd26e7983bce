//! Integration tests for cart transitions

use rust_decimal::Decimal;
use testresult::TestResult;

use campus_cart::{
    cart::{CartAction, CartError, CartState},
    products::{ProductId, ProductSummary},
};

fn product(id: &str, price: i64, stock: u32) -> ProductSummary {
    ProductSummary::new(id, id, Decimal::from(price), stock)
}

fn add(product: &ProductSummary, quantity: u32, rental_days: u32) -> CartAction {
    CartAction::AddItem {
        product: product.clone(),
        quantity,
        rental_days,
    }
}

fn expected_total(cart: &CartState) -> Decimal {
    cart.items()
        .iter()
        .map(|item| {
            item.product.price_per_day
                * Decimal::from(item.rental_days)
                * Decimal::from(item.quantity)
        })
        .sum()
}

#[test]
fn repeated_adds_sum_until_stock_is_exhausted() -> TestResult {
    let tent = product("tent", 15, 7);
    let mut cart = CartState::new();
    let mut accepted = 0;

    for _ in 0..5 {
        match cart.apply(add(&tent, 2, 2)) {
            Ok(next) => {
                cart = next;
                accepted += 2;
            }
            Err(error) => {
                assert!(
                    matches!(error, CartError::InsufficientStock { available: 7, .. }),
                    "unexpected rejection: {error}"
                );
            }
        }
    }

    assert_eq!(accepted, 6);
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.item_count(), 6);

    Ok(())
}

#[test]
fn total_matches_line_formula_for_every_reachable_state() -> TestResult {
    let bike = product("bike", 20, 5);
    let lamp = ProductSummary::new("lamp", "Lamp", Decimal::new(375, 2), 4);

    let actions = [
        add(&bike, 1, 1),
        add(&lamp, 2, 3),
        add(&bike, 2, 4),
        CartAction::UpdateQuantity {
            product_id: lamp.id.clone(),
            quantity: 4,
        },
        CartAction::UpdateItemRentalDays {
            product_id: lamp.id.clone(),
            rental_days: 2,
        },
        add(&bike, 9, 1),
        CartAction::RemoveItem {
            product_id: bike.id.clone(),
        },
        add(&bike, 1, 6),
        CartAction::UpdateRentalDays { rental_days: 5 },
        CartAction::UpdateRentalDays { rental_days: 0 },
        CartAction::Clear,
    ];

    let mut cart = CartState::new();

    for action in actions {
        if let Ok(next) = cart.apply(action) {
            cart = next;
        }

        assert_eq!(cart.total_amount(), expected_total(&cart));
    }

    assert!(cart.is_empty());

    Ok(())
}

#[test]
fn remove_then_add_starts_a_fresh_line() -> TestResult {
    let bike = product("bike", 20, 5);

    let cart = CartState::new()
        .apply(add(&bike, 4, 1))?
        .apply(CartAction::RemoveItem {
            product_id: bike.id.clone(),
        })?
        .apply(add(&bike, 1, 1))?;

    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.total_amount(), Decimal::from(20));

    Ok(())
}

#[test]
fn removing_unknown_product_is_a_noop() -> TestResult {
    let cart = CartState::new().apply(add(&product("bike", 20, 5), 1, 1))?;

    let next = cart.apply(CartAction::RemoveItem {
        product_id: ProductId::new("ghost"),
    })?;

    assert_eq!(next, cart);

    Ok(())
}

#[test]
fn cart_wide_duration_updates_every_line_and_default() -> TestResult {
    let bike = product("bike", 20, 5);
    let lamp = product("lamp", 4, 3);

    let cart = CartState::new()
        .apply(add(&bike, 1, 1))?
        .apply(add(&lamp, 2, 3))?
        .apply(CartAction::UpdateRentalDays { rental_days: 7 })?;

    assert!(cart.items().iter().all(|item| item.rental_days == 7));
    assert_eq!(cart.rental_days_default(), 7);
    assert_eq!(cart.total_amount(), Decimal::from(20 * 7 + 4 * 7 * 2));

    let rejected = cart.apply(CartAction::UpdateRentalDays { rental_days: 0 });

    assert_eq!(rejected, Err(CartError::InvalidRentalDays(0)));
    assert_eq!(cart.rental_days_default(), 7);

    Ok(())
}

#[test]
fn item_duration_rejects_zero_days() -> TestResult {
    let bike = product("bike", 20, 5);
    let cart = CartState::new().apply(add(&bike, 1, 2))?;

    let result = cart.apply(CartAction::UpdateItemRentalDays {
        product_id: bike.id.clone(),
        rental_days: 0,
    });

    assert_eq!(result, Err(CartError::InvalidRentalDays(0)));

    Ok(())
}

#[test]
fn quantity_updates_follow_stock() -> TestResult {
    let p = product("p", 20, 5);

    let cart = CartState::new().apply(add(&p, 2, 3))?;

    assert_eq!(cart.total_amount(), Decimal::from(120));

    let cart = cart.apply(CartAction::UpdateQuantity {
        product_id: p.id.clone(),
        quantity: 4,
    })?;

    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.total_amount(), Decimal::from(240));

    let rejected = cart.apply(CartAction::UpdateQuantity {
        product_id: p.id.clone(),
        quantity: 6,
    });

    assert_eq!(
        rejected,
        Err(CartError::InsufficientStock {
            product_id: p.id.clone(),
            requested: 6,
            available: 5,
        })
    );
    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.total_amount(), Decimal::from(240));

    Ok(())
}

#[test]
fn zero_quantity_update_removes_the_product() -> TestResult {
    let p = product("p", 20, 5);

    let cart = CartState::new()
        .apply(add(&p, 2, 3))?
        .apply(add(&p, 1, 1))?
        .apply(CartAction::UpdateQuantity {
            product_id: p.id.clone(),
            quantity: 0,
        })?;

    assert!(cart.is_empty());
    assert_eq!(cart.total_amount(), Decimal::ZERO);

    Ok(())
}

#[test]
fn clear_resets_to_an_empty_cart() -> TestResult {
    let cart = CartState::new()
        .apply(add(&product("p", 20, 5), 2, 3))?
        .apply(CartAction::UpdateRentalDays { rental_days: 3 })?
        .apply(CartAction::Clear)?;

    assert_eq!(cart, CartState::new());

    Ok(())
}
