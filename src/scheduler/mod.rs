/// 경매 만료 스케줄러
/// 일정 간격으로 만료 스윕을 실행해 종료 시간이 지난 경매를 해소한다.
/// 프로세스 시작 시 한 번 즉시 실행하고, 이후 고정 간격으로 반복한다.
// region:    --- Imports
use crate::bidding::commands;
use crate::database::DatabaseManager;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Auction Scheduler
/// 경매 만료 스케줄러
pub struct AuctionScheduler {
    db: Arc<DatabaseManager>,
    sweep_interval: Duration,
}

/// 실행 중인 스케줄러 핸들. shutdown으로 정리 종료한다.
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// 스케줄러 정리 종료
    /// 진행 중인 스윕이 있으면 끝날 때까지 기다린다.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!("{:<12} --> 스케줄러 태스크 종료 오류: {:?}", "Scheduler", e);
        }
        info!("{:<12} --> 스케줄러 종료됨", "Scheduler");
    }
}

impl AuctionScheduler {
    pub fn new(db: Arc<DatabaseManager>, sweep_interval: Duration) -> Self {
        Self { db, sweep_interval }
    }

    /// 스케줄러 시작
    /// 단일 워커 태스크 하나가 모든 스윕을 순차 실행하므로
    /// 이전 스윕이 끝나기 전에 새 스윕이 시작되는 일은 없다.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let db = Arc::clone(&self.db);
        let sweep_interval = self.sweep_interval;

        let task = tokio::spawn(async move {
            info!(
                "{:<12} --> 만료 스케줄러 시작(간격: {:?})",
                "Scheduler", sweep_interval
            );

            // 시작 직후 한 번 실행
            Self::run_sweep(&db).await;

            let mut ticker = interval(sweep_interval);
            // 스윕이 간격보다 오래 걸리면 다음 틱만 밀린다(버스트 없음)
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 첫 틱은 즉시 발화하므로 소비한다
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        Self::run_sweep(&db).await;
                    }
                    _ = shutdown_rx.changed() => {
                        break;
                    }
                }
            }
        });

        SchedulerHandle { shutdown_tx, task }
    }

    /// 만료 스윕 1회 실행
    /// 실패해도 태스크는 죽지 않는다. 다음 틱에서 재시도한다.
    async fn run_sweep(db: &DatabaseManager) {
        match commands::expire_auctions(db).await {
            Ok(0) => {
                debug!("{:<12} --> 만료 대상 경매 없음", "Scheduler");
            }
            Ok(processed) => {
                info!(
                    "{:<12} --> 만료 경매 {}건 처리 완료",
                    "Scheduler", processed
                );
            }
            Err(e) => {
                error!("{:<12} --> 만료 스윕 중 오류 발생: {:?}", "Scheduler", e);
            }
        }
    }
}
// endregion: --- Auction Scheduler
