use std::panic::{self, AssertUnwindSafe};

use parsort_comp::dist::{self, Communicator, LocalGroup, Universe};
use parsort_comp::{serial, Record};
use sort_test_tools::patterns;

fn keys(v: &[Record]) -> Vec<f64> {
    v.iter().map(|r| r.key).collect()
}

/// Scatters `data` from rank 0, runs `sorter` on every member, gathers the
/// result back to rank 0.
fn sort_on_universe<G>(data: Vec<Record>, processes: usize, sorter: G) -> Vec<Record>
where
    G: Fn(&mut Vec<Record>, &LocalGroup) + Sync,
{
    let mut results = Universe::run(processes, |group| {
        let seed = if group.rank() == 0 {
            Some(data.clone())
        } else {
            None
        };
        let mut local = dist::distribute(seed, &group);
        sorter(&mut local, &group);
        dist::collect(local, &group)
    });

    results.remove(0).expect("rank 0 gathers the result")
}

mod dist_bisection {
    use sort_test_tools::{instantiate_sort_tests, Record, Sort};

    pub struct SortImpl {}

    impl Sort for SortImpl {
        fn name() -> String {
            "mpi_style_bisection_p4".into()
        }

        fn sort(arr: &mut [Record]) {
            Self::sort_by(arr, parsort_comp::record::key_ge);
        }

        fn sort_by<F>(arr: &mut [Record], is_ge: F)
        where
            F: Fn(f64, f64) -> bool + Sync,
        {
            let sorted = super::sort_on_universe(arr.to_vec(), 4, |local, group| {
                parsort_comp::dist::bisection::sort_by(local, group, |a, b| is_ge(a, b));
            });
            arr.copy_from_slice(&sorted);
        }
    }

    instantiate_sort_tests!(SortImpl);
}

mod dist_psrs {
    use sort_test_tools::{instantiate_sort_tests, Record, Sort};

    pub struct SortImpl {}

    impl Sort for SortImpl {
        fn name() -> String {
            "mpi_style_psrs_p4".into()
        }

        fn sort(arr: &mut [Record]) {
            Self::sort_by(arr, parsort_comp::record::key_ge);
        }

        fn sort_by<F>(arr: &mut [Record], is_ge: F)
        where
            F: Fn(f64, f64) -> bool + Sync,
        {
            let sorted = super::sort_on_universe(arr.to_vec(), 4, |local, group| {
                parsort_comp::dist::psrs::sort_by(local, group, |a, b| is_ge(a, b));
            });
            arr.copy_from_slice(&sorted);
        }
    }

    instantiate_sort_tests!(SortImpl);
}

// --- SCENARIOS ---

#[test]
fn bisection_p4_matches_serial() {
    // 1000 uniform keys across 4 processes, gathered at the root, must read
    // exactly like the serial sort of the same buffer.
    let data = patterns::random_unit(1000);

    let mut expected = data.clone();
    serial::sort(&mut expected);

    let sorted = sort_on_universe(data, 4, |local, group| {
        dist::bisection::sort(local, group);
    });

    assert_eq!(keys(&sorted), keys(&expected));
}

#[test]
fn psrs_p4_matches_serial() {
    let data = patterns::random_unit(1000);

    let mut expected = data.clone();
    serial::sort(&mut expected);

    let sorted = sort_on_universe(data, 4, |local, group| {
        dist::psrs::sort(local, group);
    });

    assert_eq!(keys(&sorted), keys(&expected));
}

#[test]
fn bisection_rejects_odd_groups() {
    // The pairwise-halving invariant cannot hold for P=3: the whole group
    // must abort.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        sort_on_universe(patterns::random_unit(60), 3, |local, group| {
            dist::bisection::sort(local, group);
        })
    }));

    assert!(result.is_err());
}

#[test]
fn psrs_accepts_odd_groups() {
    // Only bisection needs an even group; PSRS runs one flat exchange.
    let data = patterns::random_unit(999);

    let mut expected = data.clone();
    serial::sort(&mut expected);

    let sorted = sort_on_universe(data, 3, |local, group| {
        dist::psrs::sort(local, group);
    });

    assert_eq!(keys(&sorted), keys(&expected));
}

#[test]
fn single_process_groups_sort_locally() {
    for data in [patterns::random_unit(128), Vec::new()] {
        let mut expected = data.clone();
        serial::sort(&mut expected);

        let sorted = sort_on_universe(data.clone(), 1, |local, group| {
            dist::bisection::sort(local, group);
        });
        assert_eq!(keys(&sorted), keys(&expected));

        let sorted = sort_on_universe(data, 1, |local, group| {
            dist::psrs::sort(local, group);
        });
        assert_eq!(keys(&sorted), keys(&expected));
    }
}

#[test]
fn tiny_buffers_survive_distribution() {
    // Fewer elements than processes leaves some members with empty or
    // single-element chunks at every recursion level.
    for len in [0, 1, 2, 3, 5] {
        let data = patterns::random_unit(len);

        let mut expected = data.clone();
        serial::sort(&mut expected);

        let sorted = sort_on_universe(data.clone(), 4, |local, group| {
            dist::bisection::sort(local, group);
        });
        assert_eq!(keys(&sorted), keys(&expected), "bisection len {len}");

        let sorted = sort_on_universe(data, 4, |local, group| {
            dist::psrs::sort(local, group);
        });
        assert_eq!(keys(&sorted), keys(&expected), "psrs len {len}");
    }
}

#[test]
fn eight_process_bisection_recurses_two_levels() {
    let data = patterns::random_unit(4096);

    let mut expected = data.clone();
    serial::sort(&mut expected);

    let sorted = sort_on_universe(data, 8, |local, group| {
        dist::bisection::sort(local, group);
    });

    assert_eq!(keys(&sorted), keys(&expected));
}

#[test]
fn group_split_keeps_rank_order() {
    let memberships = Universe::run(6, |group| {
        let color = usize::from(group.rank() % 2 == 0);
        let sub = group.split(color);
        (group.rank(), color, sub.rank(), sub.size(), sub.generation())
    });

    for (world_rank, color, sub_rank, sub_size, generation) in memberships {
        assert_eq!(sub_size, 3);
        assert_eq!(generation, 1);
        // Members keep their relative order: world ranks 1,3,5 become 0,1,2
        // in color 0; 0,2,4 become 0,1,2 in color 1.
        let expected_rank = world_rank / 2;
        assert_eq!(sub_rank, expected_rank, "world rank {world_rank} color {color}");
    }
}

#[test]
fn collectives_roundtrip() {
    // Exercises the transport underneath the sorts: broadcast, gather and
    // the two all-to-all flavors.
    let outcomes = Universe::run(4, |group| {
        let rank = group.rank();
        let size = group.size();

        let shared = group.broadcast(0, vec![rank as f64 * 10.0]);
        assert_eq!(shared, vec![0.0]);

        let gathered = group.gather(0, vec![rank, rank]);
        if rank == 0 {
            assert_eq!(gathered.unwrap(), vec![0, 0, 1, 1, 2, 2, 3, 3]);
        } else {
            assert!(gathered.is_none());
        }

        let counts = group.all_to_all(vec![rank; size]);
        assert_eq!(counts, vec![0, 1, 2, 3]);

        // Send `dst + 1` records to every destination.
        let send_counts: Vec<usize> = (0..size).map(|dst| dst + 1).collect();
        let data: Vec<Record> = (0..size)
            .flat_map(|dst| (0..dst + 1).map(move |_| Record::new(rank as f64)))
            .collect();
        let recv_counts = vec![rank + 1; size];
        let incoming = group.all_to_allv(&data, &send_counts, &recv_counts);

        assert_eq!(incoming.len(), (rank + 1) * size);
        for (src, chunk) in incoming.chunks(rank + 1).enumerate() {
            assert!(chunk.iter().all(|r| r.key == src as f64));
        }

        rank
    });

    assert_eq!(outcomes, vec![0, 1, 2, 3]);
}
