use shared_models::clinic::{Booking, BookingStatus, Medicine, Order, OrderStatus};

use crate::error::ClinicalError;

pub fn ensure_positive_quantity(quantity: i64) -> Result<(), ClinicalError> {
    if quantity > 0 {
        Ok(())
    } else {
        Err(ClinicalError::InvalidQuantity(quantity))
    }
}

pub fn ensure_pending(booking: &Booking) -> Result<(), ClinicalError> {
    match booking.status {
        BookingStatus::Pending => Ok(()),
        BookingStatus::Completed => Err(ClinicalError::BookingNotPending(booking.id)),
    }
}

pub fn ensure_unpaid(order: &Order) -> Result<(), ClinicalError> {
    match order.status {
        OrderStatus::Unpaid => Ok(()),
        OrderStatus::Paid => Err(ClinicalError::AlreadySettled(order.id)),
    }
}

pub fn ensure_stock(medicine: &Medicine, requested: i64) -> Result<(), ClinicalError> {
    if medicine.stock >= requested {
        Ok(())
    } else {
        Err(ClinicalError::InsufficientStock {
            medicine: medicine.name.clone(),
            available: medicine.stock,
            requested,
        })
    }
}

pub fn prescription_text(medicine_name: &str, quantity: i64) -> String {
    format!("Rx: {} x {}", medicine_name, quantity)
}

/// Frozen onto the order at creation; never recomputed from later prices.
pub fn order_total(unit_price: f64, quantity: i64) -> f64 {
    unit_price * quantity as f64
}
