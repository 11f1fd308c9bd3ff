use pushfight_solver::core::bits::{
    move_bit, pdep, pdep_fallback, pext, pext_fallback, set_bits,
};

#[test]
fn set_bits_of_zero_is_empty() {
    let actual: Vec<u32> = set_bits(0b0).collect();
    assert!(actual.is_empty());
}

#[test]
fn set_bits_singletons() {
    assert_eq!(set_bits(0b1).collect::<Vec<u32>>(), vec![0]);
    assert_eq!(set_bits(0b10).collect::<Vec<u32>>(), vec![1]);
    assert_eq!(set_bits(1 << 31).collect::<Vec<u32>>(), vec![31]);
}

#[test]
fn set_bits_ascending() {
    assert_eq!(set_bits(0b11).collect::<Vec<u32>>(), vec![0, 1]);
    assert_eq!(
        set_bits(0b1010_0110).collect::<Vec<u32>>(),
        vec![1, 2, 5, 7]
    );
    assert_eq!(set_bits(u32::MAX).count(), 32);
}

#[test]
fn move_bit_transfers_only_the_owning_mask() {
    let mut owner = 0b0000_0100u32;
    let mut bystander = 0b0001_0000u32;
    // The same call is applied to both masks; only the one holding bit 2
    // changes.
    move_bit(&mut owner, 2, 6);
    move_bit(&mut bystander, 2, 6);
    assert_eq!(owner, 0b0100_0000);
    assert_eq!(bystander, 0b0001_0000);
}

#[test]
fn move_bit_of_absent_bit_is_noop() {
    let mut mask = 0u32;
    move_bit(&mut mask, 3, 9);
    assert_eq!(mask, 0);
}

#[test]
fn pext_gathers_under_mask() {
    // Mask selects bits {1, 2, 3}; value holds bits {1, 3} of those.
    assert_eq!(pext_fallback(0b1010, 0b1110), 0b101);
    assert_eq!(pext_fallback(0xffff_ffff, 0), 0);
    assert_eq!(pext_fallback(0xdead_beef, 0xffff_ffff), 0xdead_beef);
    assert_eq!(pext_fallback(0b100, 0b100), 0b1);
}

#[test]
fn pdep_scatters_under_mask() {
    assert_eq!(pdep_fallback(0b101, 0b1110), 0b1010);
    assert_eq!(pdep_fallback(0, 0xffff_ffff), 0);
    assert_eq!(pdep_fallback(0b1, 0b1000_0000), 0b1000_0000);
}

#[test]
fn pdep_inverts_pext() {
    let masks = [0u32, 0b1, 0b1110, 0x00ff_ff00, 0xaaaa_5555, u32::MAX];
    let values = [0u32, 0b1011, 0x1234_5678, 0xdead_beef, u32::MAX];
    for &m in &masks {
        for &v in &values {
            let dense = pext_fallback(v, m);
            assert_eq!(pdep_fallback(dense, m), v & m, "mask {m:#x} value {v:#x}");
            // The dispatching wrappers agree with the fallbacks whatever the
            // target features.
            assert_eq!(pext(v, m), dense);
            assert_eq!(pdep(dense, m), v & m);
        }
    }
}
