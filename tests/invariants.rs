use fm_partition::{
    BisectionPartitioningConfig, Hypergraph, InitialPartitioningMethod, PartitionResult, Side,
    StopReason,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BALANCE_FACTORS: [f64; 5] = [0.1, 0.3, 0.5, 0.8, 1.0];

fn random_netlist(rng: &mut StdRng) -> String {
    let cell_count = rng.gen_range(1..40);
    let net_count = rng.gen_range(1..30);
    let mut text = format!("{}\n", BALANCE_FACTORS[rng.gen_range(0..BALANCE_FACTORS.len())]);
    for n in 0..net_count {
        text.push_str(&format!("NET n{n}"));
        for _ in 0..rng.gen_range(1..7) {
            text.push_str(&format!(" c{}", rng.gen_range(0..cell_count)));
        }
        text.push_str(" ;\n");
    }
    text
}

fn check_counters(graph: &Hypergraph) {
    let mut sizes = [0, 0];
    for c in graph.cells() {
        sizes[c.side.index()] += 1;
        assert!(!c.locked);
    }
    assert_eq!(graph.side_sizes(), sizes);
    for net in graph.nets() {
        assert_eq!(
            (net.side_count[0] + net.side_count[1]) as usize,
            net.cells.len()
        );
        let on_b = net
            .cells
            .iter()
            .filter(|&&c| graph.cell(c).side == Side::B)
            .count();
        assert_eq!(net.side_count[1] as usize, on_b);
    }
    assert_eq!(graph.cut_size(), graph.calculate_cut_size());
}

#[test]
fn random_netlists_keep_their_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let methods = [
        InitialPartitioningMethod::LogicAffinity,
        InitialPartitioningMethod::Modulo,
        InitialPartitioningMethod::Random,
    ];

    for round in 0..200 {
        let text = random_netlist(&mut rng);
        let method = methods[round % methods.len()];
        let mut graph = Hypergraph::parse(&text).unwrap();
        for net in graph.nets() {
            let mut cells = net.cells.clone();
            cells.sort_unstable();
            cells.dedup();
            assert_eq!(cells.len(), net.cells.len(), "duplicate pin in\n{text}");
        }

        let config = BisectionPartitioningConfig {
            initial_partitioning: method,
            rng_seed: round as u64,
            ..Default::default()
        };
        let report = graph.partition_bisection(&config).unwrap();
        check_counters(&graph);

        let mut cut = report.initial_cut_size;
        for pass in report.passes.iter() {
            assert!(pass.kept_moves <= pass.moves);
            assert_eq!(pass.cut_size, cut - pass.max_gain.max(0) as u32);
            cut = pass.cut_size;
        }
        assert_eq!(graph.cut_size(), cut);
        assert!(report.final_cut_size() <= report.initial_cut_size);

        if report.stop == StopReason::Converged {
            let before: Vec<_> = graph.cells().iter().map(|c| c.side).collect();
            graph.refine(&config).unwrap();
            let after: Vec<_> = graph.cells().iter().map(|c| c.side).collect();
            assert_eq!(before, after, "refining a converged partition moved cells\n{text}");
        }

        let mut out = Vec::new();
        graph.write_result(&mut out).unwrap();
        let result = PartitionResult::parse(std::str::from_utf8(&out).unwrap()).unwrap();
        for side in Side::BOTH {
            for name in result.groups[side.index()].iter() {
                assert_eq!(graph.side_of(name), Some(side));
            }
        }
        assert_eq!(
            result.groups[0].len() + result.groups[1].len(),
            graph.cell_count()
        );
    }
}

#[test]
fn passes_never_leave_the_bounds_once_inside() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let text = random_netlist(&mut rng);
        let mut graph = Hypergraph::parse(&text).unwrap();
        let bounds =
            fm_partition::BalanceBounds::new(graph.cell_count(), graph.balance_factor());
        let mut rng_seed = StdRng::seed_from_u64(0);
        graph.partition_initial(InitialPartitioningMethod::Modulo, &mut rng_seed);
        let inside = bounds.contains(graph.side_sizes());

        let report = graph
            .refine(&BisectionPartitioningConfig::default())
            .unwrap();
        if inside {
            for pass in report.passes.iter() {
                assert!(bounds.contains(pass.side_sizes), "{:?}\n{text}", pass);
            }
        }
    }
}
