use super::flags::Flags;
use super::instructions::JumpCondition;

#[test]
fn compare_sets_exactly_one_ordering_flag() {
    assert_eq!(Flags::compare(5, 5).bits(), Flags::EQ);
    assert_eq!(Flags::compare(3, 5).bits(), Flags::LT);
    assert_eq!(Flags::compare(7, 5).bits(), Flags::GT);
    assert_eq!(Flags::compare(0, 0).bits(), Flags::Z | Flags::EQ);
    assert_eq!(Flags::compare(0, 1).bits(), Flags::Z | Flags::LT);
}

#[test]
fn compare_is_signed() {
    // 0xffffffff is -1
    assert!(Flags::compare(u32::MAX, 1).less());
    assert!(Flags::compare(1, u32::MAX).greater());
    assert!(Flags::compare(0x8000_0000, 0x7fff_ffff).less());
}

#[test]
fn bit_values() {
    assert_eq!(Flags::Z, 0b0001);
    assert_eq!(Flags::EQ, 0b0010);
    assert_eq!(Flags::LT, 0b0100);
    assert_eq!(Flags::GT, 0b1000);
}

#[test]
fn display() {
    assert_eq!(Flags::default().to_string(), "-");
    assert_eq!(Flags::compare(0, 0).to_string(), "Z EQ");
    assert_eq!(Flags::compare(9, 2).to_string(), "GT");
}

#[test]
fn jump_conditions() {
    use JumpCondition::*;

    let eq = Flags::compare(4, 4);
    let lt = Flags::compare(1, 4);
    let gt = Flags::compare(9, 4);
    let zero = Flags::compare(0, 4);

    let taken = |cond: JumpCondition| [eq, lt, gt, zero].map(|f| cond.is_satisfied(f));

    assert_eq!(taken(Always), [true, true, true, true]);
    assert_eq!(taken(Zero), [false, false, false, true]);
    assert_eq!(taken(NotZero), [true, true, true, false]);
    assert_eq!(taken(Equal), [true, false, false, false]);
    assert_eq!(taken(NotEqual), [false, true, true, true]);
    assert_eq!(taken(Greater), [false, false, true, false]);
    assert_eq!(taken(Less), [false, true, false, true]);
    assert_eq!(taken(GreaterEqual), [true, false, true, false]);
    assert_eq!(taken(LessEqual), [true, true, false, true]);
}
