use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn keypair() -> ElGamalKeyPair {
    ElGamalKeyPair::from_secret(int_to_q(48_217_339)).unwrap()
}

fn encryption_context(keypair: &ElGamalKeyPair) -> CyphertextElection {
    CyphertextElection {
        elgamal_public_key: keypair.public_key.clone(),
        crypto_extended_base_hash: hash_elems!("general-2024", "extended-base-hash"),
    }
}

fn election_metadata() -> ElectionMetadata {
    ElectionMetadata {
        object_id: "general-2024".to_string(),
        ballot_styles: vec![BallotStyle {
            object_id: "style-1".to_string(),
            contests: vec!["mayor".to_string(), "council".to_string()],
        }],
        contests: vec![
            ContestDescription {
                object_id: "mayor".to_string(),
                sequence_order: 0,
                ballot_selections: vec![
                    SelectionDescription::new("mayor-alice", 1),
                    SelectionDescription::new("mayor-bob", 2),
                ],
                number_elected: 1,
                votes_allowed: 1,
            },
            ContestDescription {
                object_id: "council".to_string(),
                sequence_order: 1,
                ballot_selections: vec![
                    SelectionDescription::new("council-carol", 1),
                    SelectionDescription::new("council-dave", 2),
                    SelectionDescription::new("council-erin", 3),
                ],
                number_elected: 2,
                votes_allowed: 2,
            },
        ],
    }
}

/// Count of decrypted true votes across all selections of a contest.
fn true_count(contest: &CyphertextBallotContest, keypair: &ElGamalKeyPair) -> u64 {
    contest
        .ballot_selections
        .iter()
        .map(|selection| elgamal_decrypt(&selection.ciphertext, &keypair.secret_key, 1).unwrap())
        .sum()
}

#[test]
fn end_to_end_ballot_encryption() {
    let keypair = keypair();
    let metadata = election_metadata();
    let context = encryption_context(&keypair);
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    // The voter picks Alice for mayor and a single council candidate,
    // undervoting the two-seat council contest. Only true selections are
    // supplied; the pipeline fills in the rest.
    let ballot = PlaintextBallot {
        object_id: "ballot-001".to_string(),
        ballot_style: "style-1".to_string(),
        contests: vec![
            PlaintextBallotContest {
                object_id: "mayor".to_string(),
                ballot_selections: vec![PlaintextBallotSelection::new("mayor-alice", 1, false)],
            },
            PlaintextBallotContest {
                object_id: "council".to_string(),
                ballot_selections: vec![PlaintextBallotSelection::new("council-dave", 1, false)],
            },
        ],
    };

    let compositor = EncryptionCompositor::new(&metadata, &context);
    let encrypted = compositor.encrypt(&ballot, &mut rng).unwrap();

    // Every contest on the style appears, fully padded.
    assert_eq!(encrypted.contests.len(), 2);
    assert_eq!(encrypted.contests[0].ballot_selections.len(), 3); // 2 + 1 placeholder
    assert_eq!(encrypted.contests[1].ballot_selections.len(), 5); // 3 + 2 placeholders

    // The padded true-count always equals number_elected.
    assert_eq!(true_count(&encrypted.contests[0], &keypair), 1);
    assert_eq!(true_count(&encrypted.contests[1], &keypair), 2);

    // The voter's actual choices decrypt as cast.
    let alice = &encrypted.contests[0].ballot_selections[0];
    assert_eq!(alice.object_id, "mayor-alice");
    assert_eq!(
        elgamal_decrypt(&alice.ciphertext, &keypair.secret_key, 1),
        Some(1)
    );
    let bob = &encrypted.contests[0].ballot_selections[1];
    assert_eq!(
        elgamal_decrypt(&bob.ciphertext, &keypair.secret_key, 1),
        Some(0)
    );

    // Mayor is not undervoted, so its placeholder stays false.
    let placeholder = &encrypted.contests[0].ballot_selections[2];
    assert!(placeholder.is_placeholder);
    assert_eq!(placeholder.object_id, "mayor-3");
    assert_eq!(
        elgamal_decrypt(&placeholder.ciphertext, &keypair.secret_key, 1),
        Some(0)
    );

    // The whole artifact self-verifies.
    assert!(encrypted
        .is_valid_encryption(&context.crypto_extended_base_hash, &context.elgamal_public_key));
    assert!(!encrypted.tracking_id.is_empty());
}

#[test]
fn two_candidate_one_seat_scenario() {
    // Two candidates A and B, one seat; the voter selects A only.
    let keypair = keypair();
    let metadata = election_metadata();
    let description = &metadata.contests[0];
    let seed = int_to_q(7001);

    let contest = PlaintextBallotContest {
        object_id: "mayor".to_string(),
        ballot_selections: vec![PlaintextBallotSelection::new("mayor-alice", 1, false)],
    };

    let encrypted =
        encrypt_contest(&contest, description, &keypair.public_key, &seed, true).unwrap();

    assert_eq!(encrypted.ballot_selections.len(), 3);
    assert_eq!(true_count(&encrypted, &keypair), 1);
    assert_eq!(encrypted.proof.constant, 1);
    assert!(encrypted.is_valid_encryption(&description.crypto_hash(), &keypair.public_key));

    // The accumulation decrypts to number_elected under the aggregate nonce.
    assert_eq!(
        elgamal_decrypt_known_nonce(
            &encrypted.elgamal_accumulate(),
            &encrypted.aggregate_nonce(),
            &keypair.public_key,
            5,
        ),
        Some(1)
    );
}

#[test]
fn omitted_contest_is_synthesized() {
    let keypair = keypair();
    let metadata = election_metadata();
    let context = encryption_context(&keypair);
    let mut rng = ChaCha20Rng::seed_from_u64(7);

    // The voter skips the council contest entirely.
    let ballot = PlaintextBallot {
        object_id: "ballot-002".to_string(),
        ballot_style: "style-1".to_string(),
        contests: vec![PlaintextBallotContest {
            object_id: "mayor".to_string(),
            ballot_selections: vec![PlaintextBallotSelection::new("mayor-bob", 1, false)],
        }],
    };

    let encrypted = encrypt_ballot(&ballot, &metadata, &context, &mut rng, true).unwrap();

    // The omitted contest still appears: all-false real selections plus
    // number_elected true placeholders.
    let council = &encrypted.contests[1];
    assert_eq!(council.object_id, "council");
    assert_eq!(council.ballot_selections.len(), 5);
    for selection in council.ballot_selections.iter().take(3) {
        assert_eq!(
            elgamal_decrypt(&selection.ciphertext, &keypair.secret_key, 1),
            Some(0)
        );
    }
    for placeholder in council.ballot_selections.iter().skip(3) {
        assert!(placeholder.is_placeholder);
        assert_eq!(
            elgamal_decrypt(&placeholder.ciphertext, &keypair.secret_key, 1),
            Some(1)
        );
    }

    assert!(encrypted
        .is_valid_encryption(&context.crypto_extended_base_hash, &context.elgamal_public_key));
}

#[test]
fn padding_reaches_number_elected_for_any_undervote() {
    let keypair = keypair();
    let metadata = election_metadata();
    let description = &metadata.contests[1]; // 3 candidates, 2 seats
    let seed = int_to_q(31_337);
    let candidates = ["council-carol", "council-dave"];

    for cast in 0..=2usize {
        let contest = PlaintextBallotContest {
            object_id: "council".to_string(),
            ballot_selections: candidates[..cast]
                .iter()
                .map(|id| PlaintextBallotSelection::new(id, 1, false))
                .collect(),
        };
        let encrypted =
            encrypt_contest(&contest, description, &keypair.public_key, &seed, true).unwrap();
        assert_eq!(true_count(&encrypted, &keypair), 2);
    }
}

#[test]
fn contest_encryption_is_idempotent() {
    let keypair = keypair();
    let metadata = election_metadata();
    let description = &metadata.contests[0];
    let seed = int_to_q(12_345);

    let contest = PlaintextBallotContest {
        object_id: "mayor".to_string(),
        ballot_selections: vec![PlaintextBallotSelection::new("mayor-alice", 1, false)],
    };

    let a = encrypt_contest(&contest, description, &keypair.public_key, &seed, true).unwrap();
    let b = encrypt_contest(&contest, description, &keypair.public_key, &seed, true).unwrap();

    for (left, right) in a.ballot_selections.iter().zip(b.ballot_selections.iter()) {
        assert_eq!(left.ciphertext, right.ciphertext);
        assert_eq!(left.proof, right.proof);
    }
    assert_eq!(a.proof, b.proof);
}

#[test]
fn tampered_selection_fails_verification() {
    let keypair = keypair();
    let metadata = election_metadata();
    let description = &metadata.contests[0];
    let seed = int_to_q(999);

    let contest = PlaintextBallotContest {
        object_id: "mayor".to_string(),
        ballot_selections: vec![PlaintextBallotSelection::new("mayor-alice", 1, false)],
    };
    let mut encrypted =
        encrypt_contest(&contest, description, &keypair.public_key, &seed, true).unwrap();
    assert!(encrypted.is_valid_encryption(&description.crypto_hash(), &keypair.public_key));

    // Flip Alice's ciphertext to an encryption of 0 without regenerating
    // the proof.
    let flipped = elgamal_encrypt(
        0,
        &encrypted.ballot_selections[0].nonce,
        &keypair.public_key,
    )
    .unwrap();
    encrypted.ballot_selections[0].ciphertext = flipped;

    assert!(!encrypted.ballot_selections[0]
        .is_valid_encryption(&description.ballot_selections[0].crypto_hash(), &keypair.public_key));
    assert!(!encrypted.is_valid_encryption(&description.crypto_hash(), &keypair.public_key));
}

#[test]
fn structural_failures_propagate() {
    let keypair = keypair();
    let metadata = election_metadata();
    let context = encryption_context(&keypair);
    let mut rng = ChaCha20Rng::seed_from_u64(3);

    // Unknown ballot style.
    let wrong_style = PlaintextBallot {
        object_id: "ballot-003".to_string(),
        ballot_style: "style-9".to_string(),
        contests: vec![],
    };
    match encrypt_ballot(&wrong_style, &metadata, &context, &mut rng, true) {
        Err(EncryptionError::BallotStyleNotFound(style)) => assert_eq!(style, "style-9"),
        other => panic!("expected BallotStyleNotFound, got {:?}", other.map(|_| ())),
    }

    // An overvoted contest fails the ballot, not just the contest.
    let overvoted = PlaintextBallot {
        object_id: "ballot-004".to_string(),
        ballot_style: "style-1".to_string(),
        contests: vec![PlaintextBallotContest {
            object_id: "mayor".to_string(),
            ballot_selections: vec![
                PlaintextBallotSelection::new("mayor-alice", 1, false),
                PlaintextBallotSelection::new("mayor-bob", 1, false),
            ],
        }],
    };
    assert!(matches!(
        encrypt_ballot(&overvoted, &metadata, &context, &mut rng, true),
        Err(EncryptionError::OvervotedContest { .. })
    ));

    // A selection that doesn't belong to its description.
    let description = &metadata.contests[0].ballot_selections[0];
    let stray = PlaintextBallotSelection::new("council-carol", 1, false);
    assert!(matches!(
        encrypt_selection(&stray, description, &keypair.public_key, &int_to_q(5), false, true),
        Err(EncryptionError::SelectionMismatch { .. })
    ));
}

#[test]
fn serialized_ballot_omits_nonces() {
    let keypair = keypair();
    let metadata = election_metadata();
    let context = encryption_context(&keypair);
    let mut rng = ChaCha20Rng::seed_from_u64(11);

    let ballot = PlaintextBallot {
        object_id: "ballot-005".to_string(),
        ballot_style: "style-1".to_string(),
        contests: vec![],
    };
    let encrypted = encrypt_ballot(&ballot, &metadata, &context, &mut rng, true).unwrap();
    assert!(!encrypted.nonce.is_zero());

    let json = serde_json::to_string(&encrypted).unwrap();
    assert!(!json.contains("nonce"));

    // The public artifact survives a round trip and still verifies.
    let decoded: CyphertextBallot = serde_json::from_str(&json).unwrap();
    assert!(decoded
        .is_valid_encryption(&context.crypto_extended_base_hash, &context.elgamal_public_key));
    assert!(decoded.nonce.is_zero());
}

#[test]
fn erase_nonces_clears_every_level() {
    let keypair = keypair();
    let metadata = election_metadata();
    let context = encryption_context(&keypair);
    let mut rng = ChaCha20Rng::seed_from_u64(13);

    let ballot = PlaintextBallot {
        object_id: "ballot-006".to_string(),
        ballot_style: "style-1".to_string(),
        contests: vec![],
    };
    let mut encrypted = encrypt_ballot(&ballot, &metadata, &context, &mut rng, true).unwrap();
    encrypted.erase_nonces();

    assert!(encrypted.nonce.is_zero());
    for contest in encrypted.contests.iter() {
        assert!(contest.nonce.is_zero());
        for selection in contest.ballot_selections.iter() {
            assert!(selection.nonce.is_zero());
        }
    }

    // Erasing nonces does not touch the public artifact.
    assert!(encrypted
        .is_valid_encryption(&context.crypto_extended_base_hash, &context.elgamal_public_key));
}
