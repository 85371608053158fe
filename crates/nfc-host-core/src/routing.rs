//! Card emulation routing.
//!
//! The PN544 host has no AID routing table or T3T identifier support. The
//! surface exists so callers can sim it; every call reports failure or does
//! nothing.

use tracing::debug;

/// Card emulation routing operations.
pub trait CardEmulationRouting {
    fn route_aid(&mut self, aid: &[u8], route: i32, aid_info: i32, power: i32) -> bool {
        let _ = (route, aid_info, power);
        debug!(aid_len = aid.len(), "AID routing not supported");
        false
    }

    fn unroute_aid(&mut self, aid: &[u8]) -> bool {
        debug!(aid_len = aid.len(), "AID routing not supported");
        false
    }

    fn commit_routing(&mut self) -> bool {
        false
    }

    fn register_t3t_identifier(&mut self, _identifier: &[u8]) {}

    fn deregister_t3t_identifier(&mut self, _identifier: &[u8]) {}

    fn clear_t3t_identifiers_cache(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unsupported;
    impl CardEmulationRouting for Unsupported {}

    #[test]
    fn test_everything_unsupported() {
        let mut r = Unsupported;
        assert!(!r.route_aid(&[0xA0, 0x00, 0x00, 0x00, 0x03], 0, 0, 1));
        assert!(!r.unroute_aid(&[0xA0]));
        assert!(!r.commit_routing());
        r.register_t3t_identifier(&[0x02, 0xFE]);
        r.clear_t3t_identifiers_cache();
    }
}
