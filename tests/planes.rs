mod common;

use approx::assert_abs_diff_eq;
use common::synthetic::shifted_pair;
use plane_stereo::stages::{
    DisparityRange, FitParams, PlaneFitter, PlaneRefiner, RefineParams, RefineState,
    SegmentPlaneCostEvaluator, StereoPair,
};
use plane_stereo::{DisparityMap, Pixel, Plane, Segment, SegmentId, Segmentation};

fn plane_map(w: usize, h: usize, f: impl Fn(usize, usize) -> i16) -> DisparityMap {
    let mut map = DisparityMap::invalid(w, h, DisparityRange::new(-32, 32).unwrap());
    for y in 0..h {
        for x in 0..w {
            map.set(x, y, Some(f(x, y)));
        }
    }
    map
}

#[test]
fn known_plane_round_trips() {
    let map = plane_map(10, 10, |x, y| 2 * x as i16 - y as i16 + 5);
    let pixels: Vec<Pixel> = (2..7)
        .flat_map(|y| (1..5).map(move |x| Pixel::new(x, y)))
        .collect();
    let plane = PlaneFitter::default().fit_segment(&pixels, &map).unwrap();
    assert_abs_diff_eq!(plane.slope_x, 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(plane.slope_y, -1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(plane.intercept, 5.0, epsilon = 1e-6);
}

#[test]
fn fitting_is_idempotent() {
    // a noisy slanted surface with holes
    let mut map = plane_map(24, 16, |x, y| {
        let noise = ((x * 7 + y * 13) % 5) as i16 - 2;
        (x / 3) as i16 + (y / 4) as i16 + noise
    });
    for i in 0..24 {
        map.set(i, (i * 5) % 16, None);
    }
    let seg = Segmentation::regular_grid(24, 16, 6);
    let fitter = PlaneFitter::new(FitParams::default());
    let a = fitter.fit(&seg, &map).unwrap();
    let b = fitter.fit(&seg, &map).unwrap();
    assert_eq!(a.planes, b.planes);
    assert_eq!(a.degenerate, b.degenerate);
    assert_eq!(a.fitted_count(), seg.len());
}

#[test]
fn refinement_never_adds_segments() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (36usize, 20usize);
    let (left, right) = shifted_pair(w, h, 2);
    let pair = StereoPair::new(&left, &right).unwrap();

    // a mix of right, wrong and missing planes
    let seg = Segmentation::regular_grid(w, h, 6);
    let planes: Vec<Option<Plane>> = (0..seg.len())
        .map(|i| match i % 4 {
            0 => Some(Plane::fronto_parallel(2.0)),
            1 => Some(Plane::new(0.05, 0.0, 1.0)),
            2 => None,
            _ => Some(Plane::fronto_parallel(40.0)),
        })
        .collect();
    let disparity = plane_map(w, h, |_, _| 2);

    let refiner = PlaneRefiner::new(
        SegmentPlaneCostEvaluator::new(&pair, 0.5).unwrap(),
        PlaneFitter::default(),
        &disparity,
        RefineParams {
            iterations: 1,
            stop_on_fixed_point: false,
        },
    );
    let before = RefineState::initial(seg.clone(), planes.clone());
    let step = refiner.step(&before).unwrap();

    assert!(step.state.segmentation.len() <= seg.len());
    assert_eq!(step.state.planes.len(), step.state.segmentation.len());
    assert_eq!(step.state.segmentation.pixel_count(), seg.pixel_count());
    assert_eq!(step.groups.values().map(Vec::len).sum::<usize>(), seg.len());
    // the input state is left as it was
    assert_eq!(before.segmentation, seg);
    assert_eq!(before.planes, planes);
    // the fronto-parallel plane at d = 2 is exact and wins wherever feasible
    for (segment, &plane) in step.assignment.iter().enumerate() {
        if step.costs.best_plane(segment).is_some() {
            assert_eq!(step.costs.get(segment, plane), 0.0);
        }
    }
}

#[test]
fn hand_built_segments_merge_onto_one_plane() {
    let (w, h) = (16usize, 8usize);
    let (left, right) = shifted_pair(w, h, 1);
    let pair = StereoPair::new(&left, &right).unwrap();
    let disparity = plane_map(w, h, |_, _| 1);
    let strip = |x0: usize, x1: usize| -> Vec<Pixel> {
        (0..h)
            .flat_map(|y| (x0..x1).map(move |x| Pixel::new(x, y)))
            .collect()
    };
    let seg = Segmentation::new(
        w,
        h,
        vec![
            Segment::new(SegmentId(10), strip(0, 5)),
            Segment::new(SegmentId(20), strip(5, 10)),
            Segment::new(SegmentId(30), strip(10, 14)),
        ],
    )
    .unwrap();
    let planes = vec![
        Some(Plane::fronto_parallel(3.0)),
        Some(Plane::fronto_parallel(1.0)),
        None,
    ];
    let refiner = PlaneRefiner::new(
        SegmentPlaneCostEvaluator::new(&pair, 0.5).unwrap(),
        PlaneFitter::default(),
        &disparity,
        RefineParams::default(),
    );
    let step = refiner.step(&RefineState::initial(seg, planes)).unwrap();
    assert_eq!(step.assignment, vec![1, 1, 1]);
    assert_eq!(step.state.segmentation.len(), 1);
    assert_eq!(step.state.planes, vec![Some(Plane::fronto_parallel(1.0))]);
}
