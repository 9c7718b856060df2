use borsh::BorshSerialize;
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use vrf_raffle::{
    error::RaffleError,
    events::RaffleEvent,
    oracle::{winner_index, RandomnessOracle, RandomnessRequest},
    payout::PrizePayout,
    state::{OracleConfig, PendingRequest, Raffle, RaffleConfig, RaffleState, RequestId},
};

const START: i64 = 1_700_000_000;

// Oracle that hands out a fixed request id and records what it was asked for
struct FakeOracle {
    request_id: u64,
    requests: Vec<RandomnessRequest>,
    fail: bool,
}

impl FakeOracle {
    fn issuing(request_id: u64) -> Self {
        Self {
            request_id,
            requests: Vec::new(),
            fail: false,
        }
    }
}

impl RandomnessOracle for FakeOracle {
    fn request_randomness(&mut self, request: &RandomnessRequest) -> Result<RequestId, ProgramError> {
        if self.fail {
            return Err(RaffleError::OracleRequestFailed.into());
        }
        self.requests.push(request.clone());
        Ok(RequestId(self.request_id))
    }
}

#[derive(Default)]
struct FakePayout {
    payments: Vec<(Pubkey, u64)>,
    fail: bool,
}

impl PrizePayout for FakePayout {
    fn pay(&mut self, winner: &Pubkey, amount: u64) -> Result<(), ProgramError> {
        if self.fail {
            return Err(ProgramError::InsufficientFunds);
        }
        self.payments.push((*winner, amount));
        Ok(())
    }
}

fn config(entrance_fee: u64, eligibility_interval: u64) -> RaffleConfig {
    RaffleConfig {
        entrance_fee,
        eligibility_interval,
        max_participants: 16,
        oracle: OracleConfig {
            coordinator: Pubkey::new_unique(),
            fulfillment_authority: Pubkey::new_unique(),
            key_hash: [9; 32],
            subscription_id: 42,
            request_confirmations: 3,
            callback_compute_limit: 500_000,
        },
    }
}

fn raffle_with(entrance_fee: u64, eligibility_interval: u64, participants: usize) -> (Raffle, Vec<Pubkey>) {
    let mut raffle = Raffle::new(Pubkey::new_unique(), config(entrance_fee, eligibility_interval), START);
    let players: Vec<Pubkey> = (0..participants).map(|_| Pubkey::new_unique()).collect();
    for player in &players {
        raffle.enter(*player, entrance_fee).unwrap();
    }
    (raffle, players)
}

fn locked_raffle(request_id: u64, participants: usize) -> (Raffle, Vec<Pubkey>) {
    let (mut raffle, players) = raffle_with(1, 60, participants);
    raffle
        .trigger_resolution(START + 61, &mut FakeOracle::issuing(request_id))
        .unwrap();
    (raffle, players)
}

fn assert_invariants(raffle: &Raffle) {
    assert_eq!(
        matches!(raffle.state(), RaffleState::Calculating(_)),
        raffle.pending_request().is_some()
    );
    assert_eq!(
        raffle.pool_total(),
        raffle.participant_count() as u64 * raffle.entrance_fee()
    );
}

#[test]
fn test_new_raffle_is_open_and_empty() {
    let raffle = Raffle::new(Pubkey::new_unique(), config(5, 30), START);

    assert_eq!(*raffle.state(), RaffleState::Open);
    assert_eq!(raffle.entrance_fee(), 5);
    assert_eq!(raffle.eligibility_interval(), 30);
    assert_eq!(raffle.participant_count(), 0);
    assert_eq!(raffle.pool_total(), 0);
    assert_eq!(raffle.last_resolution_timestamp(), START);
    assert_eq!(raffle.recent_winner(), None);
    assert_eq!(raffle.num_words(), 1);
    assert_eq!(raffle.request_confirmations(), 3);
    assert_eq!(raffle.callback_compute_limit(), 500_000);
    assert!(raffle.pending_request().is_none());
}

#[test]
fn test_config_validation() {
    assert!(config(1, 0).validate().is_ok());
    assert_eq!(config(0, 60).validate(), Err(RaffleError::InvalidConfiguration));

    let mut no_capacity = config(1, 60);
    no_capacity.max_participants = 0;
    assert_eq!(no_capacity.validate(), Err(RaffleError::InvalidConfiguration));
}

#[test]
fn test_enter_rejects_insufficient_fee() {
    let (mut raffle, _) = raffle_with(10, 60, 0);
    let before = raffle.clone();

    let result = raffle.enter(Pubkey::new_unique(), 9);

    assert_eq!(result, Err(RaffleError::InsufficientFee.into()));
    assert_eq!(raffle, before);
}

#[test]
fn test_enter_appends_participant_and_grows_pool_by_fee() {
    let (mut raffle, _) = raffle_with(10, 60, 2);
    let player = Pubkey::new_unique();

    let event = raffle.enter(player, 25).unwrap();

    assert_eq!(event, RaffleEvent::ParticipantJoined { participant: player });
    assert_eq!(raffle.participant_count(), 3);
    assert_eq!(raffle.participant(2), Some(&player));
    // Overpayment is not credited to the pool
    assert_eq!(raffle.pool_total(), 30);
    assert_invariants(&raffle);
}

#[test]
fn test_same_participant_may_enter_repeatedly() {
    let (mut raffle, _) = raffle_with(1, 60, 0);
    let player = Pubkey::new_unique();

    raffle.enter(player, 1).unwrap();
    raffle.enter(player, 1).unwrap();

    assert_eq!(raffle.participant_count(), 2);
    assert_eq!(raffle.pool_total(), 2);
}

#[test]
fn test_enter_rejected_when_full() {
    let mut small = config(1, 60);
    small.max_participants = 2;
    let mut raffle = Raffle::new(Pubkey::new_unique(), small, START);
    raffle.enter(Pubkey::new_unique(), 1).unwrap();
    raffle.enter(Pubkey::new_unique(), 1).unwrap();

    let result = raffle.enter(Pubkey::new_unique(), 1);

    assert_eq!(result, Err(RaffleError::RaffleFull.into()));
    assert_eq!(raffle.participant_count(), 2);
}

#[test]
fn test_eligibility_ready_only_when_all_conditions_hold() {
    // (locked, participants, checked at) for every reachable combination
    let cases: [(bool, usize, i64); 6] = [
        (false, 0, START + 30),
        (false, 0, START + 61),
        (false, 2, START + 30),
        (false, 2, START + 61),
        (true, 2, START + 30),
        (true, 2, START + 61),
    ];

    for (locked, participants, now) in cases {
        let raffle = if locked {
            locked_raffle(7, participants).0
        } else {
            raffle_with(1, 60, participants).0
        };
        let eligibility = raffle.check_eligibility(now);
        let conditions = eligibility.conditions;

        assert_eq!(conditions.is_open, !locked);
        assert_eq!(conditions.interval_elapsed, now >= START + 60);
        assert_eq!(conditions.has_participants, participants > 0);
        assert_eq!(conditions.has_pool, participants > 0);
        assert_eq!(
            eligibility.ready,
            conditions.is_open
                && conditions.interval_elapsed
                && conditions.has_participants
                && conditions.has_pool,
            "locked={} participants={} now={}",
            locked,
            participants,
            now
        );
        assert_eq!(eligibility.elapsed, now - START);
        assert_eq!(eligibility.participant_count, participants as u32);
    }
}

#[test]
fn test_check_eligibility_evaluates_each_condition() {
    let (empty, _) = raffle_with(1, 60, 0);
    let eligibility = empty.check_eligibility(START + 61);
    assert!(!eligibility.ready);
    assert!(eligibility.conditions.is_open);
    assert!(eligibility.conditions.interval_elapsed);
    assert!(!eligibility.conditions.has_participants);
    assert!(!eligibility.conditions.has_pool);

    let (raffle, _) = raffle_with(1, 60, 3);
    let early = raffle.check_eligibility(START + 59);
    assert!(!early.ready);
    assert!(!early.conditions.interval_elapsed);
    assert_eq!(early.elapsed, 59);

    let on_time = raffle.check_eligibility(START + 60);
    assert!(on_time.ready);
    assert_eq!(on_time.participant_count, 3);
    assert_eq!(on_time.pool_total, 3);

    // Clock behind the last resolution never counts as elapsed
    let (zero_interval, _) = raffle_with(1, 0, 1);
    assert!(!zero_interval.check_eligibility(START - 1).ready);

    let (locked, _) = locked_raffle(7, 3);
    let calculating = locked.check_eligibility(START + 1_000);
    assert!(!calculating.ready);
    assert!(!calculating.conditions.is_open);
}

#[test]
fn test_trigger_without_eligibility_changes_nothing() {
    let (mut raffle, _) = raffle_with(1, 60, 3);
    let before = raffle.clone();
    let mut oracle = FakeOracle::issuing(7);

    let result = raffle.trigger_resolution(START + 10, &mut oracle);

    assert_eq!(result, Err(RaffleError::EligibilityNotMet.into()));
    assert_eq!(raffle, before);
    assert!(oracle.requests.is_empty());
}

#[test]
fn test_trigger_locks_round_and_records_request() {
    let (mut raffle, _) = raffle_with(1, 60, 3);
    let mut oracle = FakeOracle::issuing(7);

    let event = raffle.trigger_resolution(START + 61, &mut oracle).unwrap();

    assert_eq!(event, RaffleEvent::ResolutionRequested { request_id: RequestId(7) });
    assert_eq!(
        *raffle.state(),
        RaffleState::Calculating(PendingRequest {
            request_id: RequestId(7),
            issued_at: START + 61,
        })
    );
    assert_eq!(
        oracle.requests,
        vec![RandomnessRequest {
            key_hash: [9; 32],
            subscription_id: 42,
            request_confirmations: 3,
            callback_compute_limit: 500_000,
            num_words: 1,
        }]
    );
    assert_invariants(&raffle);
}

#[test]
fn test_oracle_failure_leaves_round_open() {
    let (mut raffle, _) = raffle_with(1, 60, 3);
    let before = raffle.clone();
    let mut oracle = FakeOracle::issuing(7);
    oracle.fail = true;

    let result = raffle.trigger_resolution(START + 61, &mut oracle);

    assert_eq!(result, Err(RaffleError::OracleRequestFailed.into()));
    assert_eq!(raffle, before);
}

#[test]
fn test_locked_round_rejects_entries_and_second_trigger() {
    let (mut raffle, _) = locked_raffle(7, 3);
    let before = raffle.clone();
    let mut oracle = FakeOracle::issuing(8);

    assert_eq!(
        raffle.enter(Pubkey::new_unique(), 1),
        Err(RaffleError::RoundNotOpen.into())
    );
    assert_eq!(
        raffle.trigger_resolution(START + 1_000, &mut oracle),
        Err(RaffleError::EligibilityNotMet.into())
    );
    assert_eq!(raffle, before);
    assert!(oracle.requests.is_empty());

    raffle
        .resolve(RequestId(7), &[0], START + 100, &mut FakePayout::default())
        .unwrap();
    raffle.enter(Pubkey::new_unique(), 1).unwrap();
    assert_eq!(raffle.participant_count(), 1);
}

#[test]
fn test_resolve_rejects_unknown_request() {
    let (mut raffle, _) = locked_raffle(7, 3);
    let before = raffle.clone();
    let mut payout = FakePayout::default();

    let result = raffle.resolve(RequestId(8), &[17], START + 100, &mut payout);

    assert_eq!(result, Err(RaffleError::UnknownRequest.into()));
    assert_eq!(raffle, before);
    assert!(payout.payments.is_empty());
}

#[test]
fn test_resolve_rejects_callback_while_open() {
    let (mut raffle, _) = raffle_with(1, 60, 3);
    let before = raffle.clone();

    let result = raffle.resolve(RequestId(0), &[1], START + 100, &mut FakePayout::default());

    assert_eq!(result, Err(RaffleError::UnknownRequest.into()));
    assert_eq!(raffle, before);
}

#[test]
fn test_resolve_requires_a_random_word() {
    let (mut raffle, _) = locked_raffle(7, 3);
    let before = raffle.clone();

    let result = raffle.resolve(RequestId(7), &[], START + 100, &mut FakePayout::default());

    assert_eq!(result, Err(RaffleError::MissingRandomWords.into()));
    assert_eq!(raffle, before);
}

#[test]
fn test_failed_payout_keeps_round_locked() {
    let (mut raffle, _) = locked_raffle(7, 3);
    let before = raffle.clone();
    let mut payout = FakePayout {
        fail: true,
        ..FakePayout::default()
    };

    let result = raffle.resolve(RequestId(7), &[17], START + 100, &mut payout);

    assert_eq!(result, Err(RaffleError::PayoutFailed.into()));
    assert_eq!(raffle, before);
    assert_eq!(raffle.participant_count(), 3);
    assert!(raffle.pending_request().is_some());
}

#[test]
fn test_full_round_pays_selected_winner_and_resets() {
    // fee 1, interval 60, three entries, word 17 selects index 2
    let (mut raffle, players) = raffle_with(1, 60, 3);
    assert_eq!(raffle.pool_total(), 3);
    assert!(raffle.check_eligibility(START + 61).ready);

    let event = raffle
        .trigger_resolution(START + 61, &mut FakeOracle::issuing(7))
        .unwrap();
    assert_eq!(event, RaffleEvent::ResolutionRequested { request_id: RequestId(7) });

    let mut payout = FakePayout::default();
    let event = raffle.resolve(RequestId(7), &[17], START + 90, &mut payout).unwrap();

    assert_eq!(
        event,
        RaffleEvent::WinnerSelected {
            winner: players[2],
            amount: 3,
        }
    );
    assert_eq!(payout.payments, vec![(players[2], 3)]);
    assert_eq!(*raffle.state(), RaffleState::Open);
    assert_eq!(raffle.participant_count(), 0);
    assert_eq!(raffle.pool_total(), 0);
    assert_eq!(raffle.last_resolution_timestamp(), START + 90);
    assert_eq!(raffle.recent_winner(), Some(&players[2]));
    assert_invariants(&raffle);

    let stale = raffle.resolve(RequestId(7), &[5], START + 91, &mut payout);
    assert_eq!(stale, Err(RaffleError::UnknownRequest.into()));
    assert_eq!(payout.payments.len(), 1);
}

#[test]
fn test_new_round_waits_for_interval_after_resolution() {
    let (mut raffle, _) = locked_raffle(7, 2);
    raffle
        .resolve(RequestId(7), &[1], START + 100, &mut FakePayout::default())
        .unwrap();
    raffle.enter(Pubkey::new_unique(), 1).unwrap();

    assert!(!raffle.check_eligibility(START + 159).ready);
    assert!(raffle.check_eligibility(START + 160).ready);
}

#[test]
fn test_invariants_hold_across_rounds() {
    let (mut raffle, _) = raffle_with(3, 10, 0);
    let mut now = START;

    for round in 0..4u64 {
        for _ in 0..=round {
            raffle.enter(Pubkey::new_unique(), 3).unwrap();
            assert_invariants(&raffle);
        }
        now += 10;
        raffle
            .trigger_resolution(now, &mut FakeOracle::issuing(round + 100))
            .unwrap();
        assert_invariants(&raffle);

        let mut payout = FakePayout::default();
        raffle
            .resolve(RequestId(round + 100), &[round * 31], now, &mut payout)
            .unwrap();
        assert_eq!(payout.payments[0].1, 3 * (round + 1));
        assert_invariants(&raffle);
    }
}

#[test]
fn test_winner_index_wraps_random_word() {
    assert_eq!(winner_index(17, 3), Some(2));
    assert_eq!(winner_index(u64::MAX, 1), Some(0));
    assert_eq!(winner_index(5, 0), None);
}

#[test]
fn test_account_space_fits_largest_raffle() {
    let mut sized = config(1, 0);
    sized.max_participants = 2;
    let mut raffle = Raffle::new(Pubkey::new_unique(), sized, START);

    for round in 0..2 {
        raffle.enter(Pubkey::new_unique(), 1).unwrap();
        raffle.enter(Pubkey::new_unique(), 1).unwrap();
        raffle
            .trigger_resolution(START, &mut FakeOracle::issuing(round))
            .unwrap();
        if round == 0 {
            raffle
                .resolve(RequestId(round), &[0], START, &mut FakePayout::default())
                .unwrap();
        }
    }

    assert_eq!(raffle.try_to_vec().unwrap().len(), Raffle::space(2));
}

#[test]
fn test_events_emit_for_every_transition() {
    let (mut raffle, _) = raffle_with(1, 60, 0);

    let joined = raffle.enter(Pubkey::new_unique(), 1).unwrap();
    let requested = raffle
        .trigger_resolution(START + 61, &mut FakeOracle::issuing(7))
        .unwrap();
    let selected = raffle
        .resolve(RequestId(7), &[0], START + 62, &mut FakePayout::default())
        .unwrap();

    for event in [joined, requested, selected] {
        assert_eq!(event.emit(), Ok(()));
    }
}
