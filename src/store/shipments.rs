//! Shipment status log.
//!
//! `database/shipments.txt` is append-only: one line per status event,
//! `orderId,trackingId,customerName,address,status`. New orders append an
//! `in progress` line; `delivered` lines are written by hand or by other
//! tools.

use crate::persist::codec::shipment_status;

/// Status written for a freshly placed order
pub const STATUS_IN_PROGRESS: &str = "in progress";

pub const STATUS_DELIVERED: &str = "delivered";

/// Counts of shipment lines by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipmentTally {
    pub delivered: usize,
    pub in_progress: usize,
}

impl ShipmentTally {
    /// Count statuses (last field, case-insensitive). Other statuses and
    /// lines without a comma are ignored.
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tally = Self::default();
        for status in lines.into_iter().filter_map(shipment_status) {
            if status.eq_ignore_ascii_case(STATUS_DELIVERED) {
                tally.delivered += 1;
            } else if status.eq_ignore_ascii_case(STATUS_IN_PROGRESS) {
                tally.in_progress += 1;
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally() {
        let lines = [
            "ORD000001,TRK000001,Sara,Canal Road,in progress",
            "ORD000001,TRK000001,Sara,Canal Road,Delivered",
            "ORD000002,TRK000002,Ali,Mall Road,IN PROGRESS",
            "ORD000003,TRK000003,Hina,Gulberg,returned",
            "no delimiter here",
        ];

        let tally = ShipmentTally::from_lines(lines);
        assert_eq!(tally.delivered, 1);
        assert_eq!(tally.in_progress, 2);
    }

    #[test]
    fn test_empty_tally() {
        assert_eq!(ShipmentTally::from_lines(Vec::<&str>::new()), ShipmentTally::default());
    }
}
