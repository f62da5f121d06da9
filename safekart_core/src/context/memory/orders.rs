// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDate;
use safekart_model::{OrderId, OrderRecord, OrderStatusStep};

const ORDER_PLACED: &str = "Order Placed";
const PAYMENT_CONFIRMED: &str = "Payment Confirmed";
const SHIPPED: &str = "Shipped";
const OUT_FOR_DELIVERY: &str = "Out for Delivery";
const DELIVERED: &str = "Delivered";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// The orders known to the demo store
pub(super) fn demo_orders() -> Vec<OrderRecord> {
    vec![
        OrderRecord {
            order_id: OrderId::canonicalize("SK123456789"),
            statuses: vec![
                OrderStatusStep::reached(1, ORDER_PLACED, "2024-01-15 10:30 AM"),
                OrderStatusStep::reached(2, PAYMENT_CONFIRMED, "2024-01-15 10:35 AM"),
                OrderStatusStep::reached(3, SHIPPED, "2024-01-16 02:15 PM"),
                OrderStatusStep::pending(4, OUT_FOR_DELIVERY),
                OrderStatusStep::pending(5, DELIVERED),
            ],
            tracking_number: "TRK789456123".to_string(),
            shipping_address: "42 MG Road, Bengaluru, Karnataka 560001".to_string(),
            expected_delivery: date(2024, 1, 18),
        },
        OrderRecord {
            order_id: OrderId::canonicalize("SK987654321"),
            statuses: vec![
                OrderStatusStep::reached(1, ORDER_PLACED, "2024-01-10 09:00 AM"),
                OrderStatusStep::reached(2, PAYMENT_CONFIRMED, "2024-01-10 09:02 AM"),
                OrderStatusStep::reached(3, SHIPPED, "2024-01-11 11:40 AM"),
                OrderStatusStep::reached(4, OUT_FOR_DELIVERY, "2024-01-13 08:15 AM"),
                OrderStatusStep::reached(5, DELIVERED, "2024-01-13 04:50 PM"),
            ],
            tracking_number: "TRK321654987".to_string(),
            shipping_address: "7 Park Street, Kolkata, West Bengal 700016".to_string(),
            expected_delivery: date(2024, 1, 13),
        },
        OrderRecord {
            order_id: OrderId::canonicalize("SK555666777"),
            statuses: vec![
                OrderStatusStep::reached(1, ORDER_PLACED, "2024-01-17 06:20 PM"),
                OrderStatusStep::pending(2, PAYMENT_CONFIRMED),
                OrderStatusStep::pending(3, SHIPPED),
                OrderStatusStep::pending(4, OUT_FOR_DELIVERY),
                OrderStatusStep::pending(5, DELIVERED),
            ],
            tracking_number: "TRK555666777".to_string(),
            shipping_address: "15 Marine Drive, Mumbai, Maharashtra 400020".to_string(),
            expected_delivery: date(2024, 1, 24),
        },
    ]
}
