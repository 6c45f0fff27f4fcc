//! End-to-end scenarios run through the public `run_experiment` entry point:
//! Bell pair, GHZ, deterministic reset, conditional X, a raw unitary
//! instruction, and the split simulator.

use qns_core::types::qobj::{Experiment, ExperimentConfig, QobjConfig};
use qns_core::{physics, Conditional, Instruction};
use qns_simulator::{modes::SimulatorMode, run_experiment, ResultTree};

fn hadamard(qubit: usize) -> Instruction {
    Instruction::new("u2", vec![qubit]).with_params(vec![0.0, std::f64::consts::PI])
}

fn pauli_x(qubit: usize) -> Instruction {
    Instruction::new("u3", vec![qubit]).with_params(vec![std::f64::consts::PI, 0.0, std::f64::consts::PI])
}

fn experiment(instructions: Vec<Instruction>, n_qubits: usize, memory_slots: usize) -> Experiment {
    Experiment {
        instructions,
        config: Some(ExperimentConfig {
            n_qubits: Some(n_qubits),
            memory_slots: Some(memory_slots),
            ..Default::default()
        }),
        header: None,
    }
}

#[test]
fn test_bell_pair_counts_split_roughly_evenly() {
    let instructions = vec![
        hadamard(0),
        Instruction::new("cx", vec![0, 1]),
        Instruction::new("measure", vec![0]).with_memory(vec![0]),
        Instruction::new("measure", vec![1]).with_memory(vec![1]),
    ];
    let qobj_config = QobjConfig {
        shots: Some(1024),
        seed: Some(0),
        memory: Some(true),
        ..Default::default()
    };
    let exp = experiment(instructions, 2, 2);
    let result = run_experiment(&qobj_config, &exp, SimulatorMode::Sampling, None, None).unwrap();
    assert!(result.success);
    let counts = result.data.counts.unwrap();
    assert!(!counts.contains_key("0x1"));
    assert!(!counts.contains_key("0x2"));
    let zero = *counts.get("0x0").unwrap_or(&0) as i64;
    let three = *counts.get("0x3").unwrap_or(&0) as i64;
    assert_eq!(zero + three, 1024);
    assert!((zero - 512).abs() <= 60, "0x0 count {zero} too far from 512");
    assert!((three - 512).abs() <= 60, "0x3 count {three} too far from 512");
}

#[test]
fn test_ghz_state_only_produces_all_zero_or_all_one() {
    let instructions = vec![
        hadamard(0),
        Instruction::new("cx", vec![0, 1]),
        Instruction::new("cx", vec![1, 2]),
        Instruction::new("measure", vec![0]).with_memory(vec![0]),
        Instruction::new("measure", vec![1]).with_memory(vec![1]),
        Instruction::new("measure", vec![2]).with_memory(vec![2]),
    ];
    let qobj_config = QobjConfig {
        shots: Some(512),
        seed: Some(3),
        memory: Some(true),
        ..Default::default()
    };
    let exp = experiment(instructions, 3, 3);
    let result = run_experiment(&qobj_config, &exp, SimulatorMode::Sampling, None, None).unwrap();
    assert!(result.success);
    let counts = result.data.counts.unwrap();
    for key in counts.keys() {
        assert!(key == "0x0" || key == "0x7", "unexpected GHZ outcome {key}");
    }
    let total: usize = counts.values().sum();
    assert_eq!(total, 512);
}

#[test]
fn test_deterministic_reset_always_returns_to_zero() {
    let instructions = vec![
        pauli_x(0),
        Instruction::new("reset", vec![0]),
        Instruction::new("measure", vec![0]).with_memory(vec![0]),
    ];
    let qobj_config = QobjConfig {
        shots: Some(100),
        seed: Some(11),
        memory: Some(true),
        ..Default::default()
    };
    let exp = experiment(instructions, 1, 1);
    let result = run_experiment(&qobj_config, &exp, SimulatorMode::Sampling, None, None).unwrap();
    let counts = result.data.counts.unwrap();
    assert_eq!(counts.get("0x0"), Some(&100));
}

#[test]
fn test_conditional_x_keeps_both_qubits_equal() {
    let instructions = vec![
        hadamard(0),
        Instruction::new("measure", vec![0]).with_memory(vec![0]).with_register(vec![0]),
        pauli_x(1).with_conditional(Conditional::Register(0)),
        Instruction::new("measure", vec![1]).with_memory(vec![1]),
    ];
    let qobj_config = QobjConfig {
        shots: Some(300),
        seed: Some(17),
        memory: Some(true),
        ..Default::default()
    };
    let exp = experiment(instructions, 2, 2);
    let result = run_experiment(&qobj_config, &exp, SimulatorMode::Sampling, None, None).unwrap();
    let counts = result.data.counts.unwrap();
    for key in counts.keys() {
        assert!(key == "0x0" || key == "0x3", "qubits diverged: {key}");
    }
}

#[test]
fn test_raw_unitary_instruction_flips_to_one() {
    let not_matrix = vec![vec![(0.0, 0.0), (1.0, 0.0)], vec![(1.0, 0.0), (0.0, 0.0)]];
    let instructions = vec![
        Instruction::new("unitary", vec![0]).with_matrix(not_matrix),
        Instruction::new("measure", vec![0]).with_memory(vec![0]),
    ];
    let qobj_config = QobjConfig {
        shots: Some(64),
        seed: Some(4),
        memory: Some(true),
        ..Default::default()
    };
    let exp = experiment(instructions, 1, 1);
    let result = run_experiment(&qobj_config, &exp, SimulatorMode::Sampling, None, None).unwrap();
    let counts = result.data.counts.unwrap();
    assert_eq!(counts.get("0x1"), Some(&64));
}

#[test]
fn test_split_simulator_bell_pair_leaves_concentrate_on_00_and_11() {
    let instructions = vec![
        hadamard(0),
        Instruction::new("cx", vec![0, 1]),
        Instruction::new("measure", vec![0]).with_memory(vec![0]),
        Instruction::new("measure", vec![1]).with_memory(vec![1]),
    ];
    let qobj_config = QobjConfig {
        shots: Some(1),
        seed: Some(0),
        memory: Some(true),
        ..Default::default()
    };
    let exp = experiment(instructions, 2, 2);
    let result = run_experiment(&qobj_config, &exp, SimulatorMode::Split, None, None).unwrap();
    let tree = result.data.statevector_tree.unwrap();
    match tree {
        ResultTree::Branch {
            path_0_probability,
            path_1_probability,
            path_0,
            path_1,
            ..
        } => {
            assert!((path_0_probability - 0.5).abs() < 1e-9);
            assert!((path_1_probability - 0.5).abs() < 1e-9);
            let leaves = [*path_0, *path_1];
            for leaf in leaves {
                match leaf {
                    ResultTree::Leaf { value, .. } => {
                        let max_amp = value.iter().map(|(re, im)| re * re + im * im).fold(0.0, f64::max);
                        assert!((max_amp - 1.0).abs() < 1e-9);
                    },
                    ResultTree::Branch { .. } => panic!("expected a fully-collapsed leaf"),
                }
            }
        },
        ResultTree::Leaf { .. } => panic!("expected a branch for an entangled measurement"),
    }
}

#[test]
fn test_id_u0_barrier_are_idempotent_between_gates() {
    let bare = vec![hadamard(0), Instruction::new("cx", vec![0, 1])];
    let padded = vec![
        Instruction::new("id", vec![0]),
        Instruction::new("barrier", vec![0, 1]),
        hadamard(0),
        Instruction::new("u0", vec![1]),
        Instruction::new("cx", vec![0, 1]),
        Instruction::new("barrier", vec![0, 1]),
        Instruction::new("id", vec![1]),
    ];

    let qobj_config = QobjConfig { shots: Some(1), seed: Some(0), ..Default::default() };
    let bare_result = run_experiment(&qobj_config, &experiment(bare, 2, 0), SimulatorMode::Statevector, None, None).unwrap();
    let padded_result =
        run_experiment(&qobj_config, &experiment(padded, 2, 0), SimulatorMode::Statevector, None, None).unwrap();

    let bare_sv = bare_result.data.statevector.unwrap();
    let padded_sv = padded_result.data.statevector.unwrap();
    for ((bre, bim), (pre, pim)) in bare_sv.iter().zip(padded_sv.iter()) {
        assert!((bre - pre).abs() < 1e-10);
        assert!((bim - pim).abs() < 1e-10);
    }
}

#[test]
fn test_unitary_then_its_dagger_is_reversible() {
    let matrix = physics::u3(0.7, 1.3, 2.1);
    let dagger = physics::dagger_2x2(&matrix);
    let to_params = |m: physics::Matrix2x2| {
        vec![
            vec![(m[0][0].re, m[0][0].im), (m[0][1].re, m[0][1].im)],
            vec![(m[1][0].re, m[1][0].im), (m[1][1].re, m[1][1].im)],
        ]
    };

    let instructions = vec![
        Instruction::new("unitary", vec![0]).with_matrix(to_params(matrix)),
        Instruction::new("unitary", vec![0]).with_matrix(to_params(dagger)),
    ];
    let qobj_config = QobjConfig { shots: Some(1), seed: Some(0), ..Default::default() };
    let result =
        run_experiment(&qobj_config, &experiment(instructions, 1, 0), SimulatorMode::Statevector, None, None).unwrap();
    let sv = result.data.statevector.unwrap();
    assert!((sv[0].0 - 1.0).abs() < 1e-10);
    assert!(sv[0].1.abs() < 1e-10);
    assert!(sv[1].0.abs() < 1e-10);
    assert!(sv[1].1.abs() < 1e-10);
}
