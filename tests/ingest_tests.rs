//! End-to-end ingestion tests against real GCN notice payloads.
//!
//! Each test feeds recorded broker XML through `Pipeline::handle` and checks
//! the resulting event model: tags, notices, localizations, plans and
//! notification behavior.

use std::sync::Arc;

use too_pipeline::config::PipelineConfig;
use too_pipeline::db::repositories::LocalRepository;
use too_pipeline::db::{EventRepository, FullRepository, PlanRepository};
use too_pipeline::gcn::{IngestOutcome, NoticeType, Pipeline};
use too_pipeline::models::time::parse_isotime;
use too_pipeline::tasks::RecordingNotifier;

fn fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("missing fixture {path}: {e}"))
}

struct Harness {
    pipeline: Pipeline,
    repo: Arc<LocalRepository>,
    notifier: Arc<RecordingNotifier>,
}

fn harness() -> Harness {
    let repo = Arc::new(LocalRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let config = PipelineConfig {
        telescopes: vec!["ZTF".to_string()],
        ..Default::default()
    };
    let pipeline = Pipeline::new(
        repo.clone() as Arc<dyn FullRepository>,
        notifier.clone(),
        &config,
    )
    .unwrap();
    Harness {
        pipeline,
        repo,
        notifier,
    }
}

#[tokio::test]
async fn test_grb180116a_fin_pos() {
    let h = harness();
    let payload = fixture("GRB180116A_Fermi_GBM_Fin_Pos.xml");
    h.pipeline.handle(&payload).await.unwrap();

    let dateobs = parse_isotime("2018-01-16T00:36:53").unwrap();
    let event = h.repo.get_event(dateobs).await.unwrap();
    assert_eq!(event.tags, vec!["Fermi", "long", "GRB"]);

    let notices = h.repo.notices_for_event(dateobs).await.unwrap();
    assert_eq!(notices.len(), 1);
    let notice = &notices[0];
    assert_eq!(notice.content, payload);
    assert_eq!(notice.notice_type, NoticeType::FermiGbmFinPos);
    assert_eq!(notice.date, parse_isotime("2018-01-16T00:46:05").unwrap());
    assert_eq!(
        notice.ivorn,
        "ivo://nasa.gsfc.gcn/Fermi#GBM_Fin_Pos2018-01-16T00:36:52.81_537755817_0-026"
    );
    assert_eq!(notice.stream, "Fermi");
    // The notice keeps sub-second precision; the event key is rounded.
    assert!((notice.dateobs - dateobs).num_milliseconds().abs() < 500);

    // A gamma-ray burst never pages anyone.
    assert_eq!(h.notifier.call_count(), 0);

    let localizations = h.repo.localizations_for_event(dateobs).await.unwrap();
    assert_eq!(localizations.len(), 1);
    assert!((localizations[0].total_probability() - 1.0).abs() < 1e-9);

    let plan = h
        .repo
        .get_plan(dateobs, "ZTF", "grg_greedy_0_1_block_300_90")
        .await
        .unwrap();
    assert_eq!(plan.dateobs, dateobs);

    let exposures = h
        .repo
        .planned_observations(dateobs, "ZTF", &plan.plan_name)
        .await
        .unwrap();
    assert!(!exposures.is_empty());
    for exposure in &exposures {
        assert!(exposure.field_id < 907);
        assert!(exposure.exposure_time > 0.0);
        assert!(exposure.weight <= 1.0);
    }
}

#[tokio::test]
async fn test_grb180116a_multiple_gcns() {
    // All four notices for the same burst must land on one event row with
    // no key conflicts.
    let h = harness();
    for notice_type in ["Alert", "Flt_Pos", "Gnd_Pos", "Fin_Pos"] {
        let payload = fixture(&format!("GRB180116A_Fermi_GBM_{notice_type}.xml"));
        let outcome = h.pipeline.handle(&payload).await.unwrap();
        assert!(matches!(outcome, IngestOutcome::Ingested { .. }));
    }

    assert_eq!(h.repo.event_count(), 1);
    let dateobs = parse_isotime("2018-01-16T00:36:53").unwrap();
    let notices = h.repo.notices_for_event(dateobs).await.unwrap();
    assert_eq!(notices.len(), 4);
}

#[tokio::test]
async fn test_grb180116a_redelivery_is_noop() {
    let h = harness();
    let payload = fixture("GRB180116A_Fermi_GBM_Fin_Pos.xml");
    h.pipeline.handle(&payload).await.unwrap();
    let outcome = h.pipeline.handle(&payload).await.unwrap();

    assert!(matches!(outcome, IngestOutcome::Duplicate { .. }));
    assert_eq!(h.repo.notice_count(), 1);
}

#[tokio::test]
async fn test_gbm_subthreshold() {
    let h = harness();
    let payload = fixture("GRB180422.913_Subthreshold.xml");
    h.pipeline.handle(&payload).await.unwrap();

    // Subthreshold notices carry no WhereWhen time; the event key comes from
    // the Trans_Ts Param.
    let dateobs = parse_isotime("2018-04-22T21:54:11").unwrap();
    let event = h.repo.get_event(dateobs).await.unwrap();
    assert_eq!(event.tags, vec!["Fermi", "short", "transient"]);

    let notices = h.repo.notices_for_event(dateobs).await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].notice_type, NoticeType::FermiGbmSubthresh);
    assert_eq!(notices[0].stream, "Fermi");

    assert_eq!(h.notifier.call_count(), 0);
    assert_eq!(h.notifier.text_count(), 0);
}

#[tokio::test]
async fn test_grb180116a_gnd_pos() {
    let h = harness();
    let payload = fixture("GRB180116A_Fermi_GBM_Gnd_Pos.xml");
    h.pipeline.handle(&payload).await.unwrap();

    // The ground position carries Long_short="unknown", which must not be
    // written as a tag.
    let dateobs = parse_isotime("2018-01-16T00:36:53").unwrap();
    let event = h.repo.get_event(dateobs).await.unwrap();
    assert_eq!(event.tags, vec!["Fermi", "GRB"]);
}

#[tokio::test]
async fn test_amon_150529() {
    let h = harness();
    let payload = fixture("AMON_150529.xml");
    h.pipeline.handle(&payload).await.unwrap();

    let dateobs = parse_isotime("2015-05-29T02:17:28").unwrap();
    let event = h.repo.get_event(dateobs).await.unwrap();
    assert_eq!(event.tags, vec!["AMON"]);
    assert_eq!(h.notifier.call_count(), 0);
}

#[tokio::test]
async fn test_amon_151115() {
    let h = harness();
    let payload = fixture("AMON_151115.xml");
    h.pipeline.handle(&payload).await.unwrap();

    let dateobs = parse_isotime("2015-11-15T11:53:44").unwrap();
    let event = h.repo.get_event(dateobs).await.unwrap();
    assert_eq!(event.tags, vec!["AMON"]);

    // Neutrino alerts get localized and tiled like any other cone position.
    let localizations = h.repo.localizations_for_event(dateobs).await.unwrap();
    assert_eq!(localizations.len(), 1);
    assert!(localizations[0].credible_area_deg2.unwrap() > 0.0);
}

#[tokio::test]
async fn test_followup_job_logs_exposed() {
    let h = harness();
    let payload = fixture("GRB180116A_Fermi_GBM_Fin_Pos.xml");
    let outcome = h.pipeline.handle(&payload).await.unwrap();

    let job_id = match outcome {
        IngestOutcome::Ingested { job_id, .. } => job_id,
        other => panic!("unexpected outcome: {other:?}"),
    };
    let job = h.pipeline.tracker().get_job(&job_id).unwrap();
    assert_eq!(job.status, too_pipeline::tasks::JobStatus::Completed);
    assert!(!job.logs.is_empty());
    assert!(job.result.is_some());
}
