use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::driver::AvailabilitySlot;
use crate::models::order::{Order, OrderStatus};

/// Whether expired deadlines are filtered out. Both modes are deliberate:
/// `Strict` suits an auto-suggested queue, `Lenient` a manual browse where
/// the driver may still want to see just-expired orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Strict,
    Lenient,
}

/// Unaccepted orders whose deadline falls inside the slot's window, soonest
/// deadline first. An order matches iff its deadline instant is strictly
/// before the window end; `Strict` additionally requires it to be after `now`.
pub fn matching_orders(
    orders: Vec<Order>,
    slot: &AvailabilitySlot,
    mode: MatchMode,
    now: NaiveDateTime,
) -> Vec<Order> {
    let window_end = slot.window_end();

    let mut matched: Vec<Order> = orders
        .into_iter()
        .filter(|order| {
            if order.status != OrderStatus::Unaccepted {
                return false;
            }
            let deadline = order.deadline();
            if deadline >= window_end {
                return false;
            }
            match mode {
                MatchMode::Strict => deadline > now,
                MatchMode::Lenient => true,
            }
        })
        .collect();

    matched.sort_by_key(|order| order.deadline());
    matched
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    use super::{matching_orders, MatchMode};
    use crate::models::driver::AvailabilitySlot;
    use crate::models::order::{Order, OrderItem, OrderStatus, Service};

    fn slot() -> AvailabilitySlot {
        AvailabilitySlot {
            id: Uuid::from_u128(1),
            driver_id: Uuid::from_u128(9),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            location: "market".to_string(),
        }
    }

    fn order(seed: u128, hour: u32, minute: u32) -> Order {
        Order {
            id: Uuid::from_u128(seed),
            buyer_id: Uuid::new_v4(),
            buyer_name: "buyer".to_string(),
            buyer_phone: "0911222333".to_string(),
            items: vec![OrderItem {
                name: "rice".to_string(),
                quantity: 1,
                price: 50.0,
                location: None,
                category: None,
            }],
            total_price: 50.0,
            location: "village hall".to_string(),
            is_urgent: false,
            deadline_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            deadline_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
            note: None,
            service: Service::Necessities,
            status: OrderStatus::Unaccepted,
            assigned_driver: None,
            previous_driver: None,
            actions: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn noon() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn deadline_inside_window_matches_and_past_end_does_not() {
        let inside = order(1, 17, 0);
        let outside = order(2, 18, 30);

        let matched = matching_orders(vec![inside, outside], &slot(), MatchMode::Strict, noon());

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, Uuid::from_u128(1));
    }

    #[test]
    fn window_end_itself_is_excluded() {
        let at_end = order(1, 18, 0);

        let matched = matching_orders(vec![at_end], &slot(), MatchMode::Lenient, noon());

        assert!(matched.is_empty());
    }

    #[test]
    fn strict_mode_drops_expired_deadlines_lenient_keeps_them() {
        let expired = order(1, 10, 0);

        let strict = matching_orders(vec![expired.clone()], &slot(), MatchMode::Strict, noon());
        assert!(strict.is_empty());

        let lenient = matching_orders(vec![expired], &slot(), MatchMode::Lenient, noon());
        assert_eq!(lenient.len(), 1);
    }

    #[test]
    fn matches_are_soonest_deadline_first() {
        let later = order(1, 17, 30);
        let sooner = order(2, 13, 0);

        let matched = matching_orders(vec![later, sooner], &slot(), MatchMode::Strict, noon());

        let ids: Vec<Uuid> = matched.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
    }

    #[test]
    fn accepted_orders_never_match() {
        let mut taken = order(1, 17, 0);
        taken.status = OrderStatus::Accepted;
        taken.assigned_driver = Some(Uuid::from_u128(9));

        let matched = matching_orders(vec![taken], &slot(), MatchMode::Lenient, noon());

        assert!(matched.is_empty());
    }
}
