//! 엔진과 프레젠테이션 계층 사이의 동기화 프로토콜.
//!
//! 두 개의 단방향 무제한 큐를 쓰며, 세션 시작 시 `session_channels` 로 만들어
//! 양쪽 생성자에 넘깁니다. 엔진은 상태 변경 이벤트마다 Ack 를 기다리고,
//! 사람 플레이어 요청에는 짝이 되는 응답이 올 때까지 기다립니다.

pub mod events;

use std::{collections::VecDeque, sync::Arc};

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, trace, warn, Level};
use uuid::Uuid;

use crate::{config::SyncConfig, exception::SyncError};

pub use events::{AskKind, DebugCommand, Envelope, FrontendEvent, GameEvent, PlayTarget};

struct Inbound {
    rx: mpsc::UnboundedReceiver<FrontendEvent>,
    /// 아직 소비되지 않은 수신 이벤트. 큐의 앞부분에 해당합니다.
    set_aside: VecDeque<FrontendEvent>,
}

impl Inbound {
    /// 채널에 이미 도착한 이벤트를 모두 옮겨 큐 길이를 확정합니다.
    /// 기다리는 emit 이 없을 때 불리므로 여기서 만나는 Ack 는 모두 지난 것입니다.
    fn pull_ready(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                FrontendEvent::Ack { event_id } => debug!("dropping stale ack for {}", event_id),
                event => self.set_aside.push_back(event),
            }
        }
    }
}

/// 엔진 쪽 끝. 사람 Control 도 같은 링크를 복제해 씁니다.
#[derive(Clone)]
pub struct SyncLink {
    outbound: mpsc::UnboundedSender<Envelope>,
    inbound: Arc<Mutex<Inbound>>,
    wait_for_ack: bool,
}

/// 프레젠테이션 쪽 끝
pub struct PresentationLink {
    events: mpsc::UnboundedReceiver<Envelope>,
    responses: mpsc::UnboundedSender<FrontendEvent>,
}

/// 세션 하나에 쓰일 두 채널을 만듭니다.
pub fn session_channels(config: &SyncConfig) -> (SyncLink, PresentationLink) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let link = SyncLink {
        outbound: out_tx,
        inbound: Arc::new(Mutex::new(Inbound {
            rx: in_rx,
            set_aside: VecDeque::new(),
        })),
        wait_for_ack: config.wait_for_ack,
    };
    let presentation = PresentationLink {
        events: out_rx,
        responses: in_tx,
    };
    (link, presentation)
}

impl SyncLink {
    fn send(&self, event: GameEvent) -> Result<Uuid, SyncError> {
        let envelope = Envelope {
            event_id: Uuid::new_v4(),
            event,
        };
        if tracing::enabled!(Level::TRACE) {
            match serde_json::to_string(&envelope) {
                Ok(json) => trace!("emit {}", json),
                Err(e) => warn!("could not serialize {:?}: {}", envelope.event, e),
            }
        } else {
            debug!("emit {:?} ({})", envelope.event, envelope.event_id);
        }
        let event_id = envelope.event_id;
        self.outbound
            .send(envelope)
            .map_err(|_| SyncError::Disconnected)?;
        Ok(event_id)
    }

    /// 이벤트를 보내고, 필요하면 해당 Ack 가 올 때까지 멈춥니다.
    pub async fn emit(&self, event: GameEvent) -> Result<Uuid, SyncError> {
        let needs_ack = self.wait_for_ack && event.requires_ack();
        let event_id = self.send(event)?;
        if needs_ack {
            self.wait_matching(|incoming| match incoming {
                FrontendEvent::Ack { event_id: acked } => *acked == event_id,
                _ => false,
            })
            .await?;
        }
        Ok(event_id)
    }

    /// 요청 이벤트를 보내고 `accept` 를 만족하는 응답을 기다립니다. 타임아웃은 없습니다.
    pub async fn request<F>(&self, event: GameEvent, accept: F) -> Result<FrontendEvent, SyncError>
    where
        F: FnMut(&FrontendEvent) -> bool + Send,
    {
        self.send(event)?;
        self.wait_matching(accept).await
    }

    /// 조건에 맞는 첫 수신 이벤트를 소비합니다.
    /// 맞지 않는 이벤트는 순서를 유지한 채 남겨 둡니다.
    /// 응답을 기다리는 중 도착한 다른 Ack 는 이미 지난 이벤트의 것이므로 버립니다.
    async fn wait_matching<F>(&self, mut accept: F) -> Result<FrontendEvent, SyncError>
    where
        F: FnMut(&FrontendEvent) -> bool + Send,
    {
        let mut inbound = self.inbound.lock().await;
        if let Some(pos) = inbound.set_aside.iter().position(|event| accept(event)) {
            if let Some(event) = inbound.set_aside.remove(pos) {
                return Ok(event);
            }
        }
        loop {
            match inbound.rx.recv().await {
                Some(event) if accept(&event) => return Ok(event),
                Some(FrontendEvent::Ack { event_id }) => {
                    warn!("dropping stale ack for {}", event_id);
                }
                Some(event) => {
                    debug!("setting aside {:?}", event);
                    inbound.set_aside.push_back(event);
                }
                None => return Err(SyncError::Disconnected),
            }
        }
    }

    /// 현재 큐 길이만큼만 꺼내 제어 메시지를 돌려주고,
    /// 나머지는 원래 순서대로 다시 넣습니다.
    pub async fn drain_control(&self) -> Vec<DebugCommand> {
        let mut inbound = self.inbound.lock().await;
        inbound.pull_ready();

        let len = inbound.set_aside.len();
        let mut commands = vec![];
        let mut kept = VecDeque::with_capacity(len);
        for _ in 0..len {
            let Some(event) = inbound.set_aside.pop_front() else {
                break;
            };
            match event.as_control() {
                Some(command) => {
                    info!("control message received: {}", command);
                    commands.push(command);
                }
                None => kept.push_back(event),
            }
        }
        kept.extend(inbound.set_aside.drain(..));
        inbound.set_aside = kept;
        commands
    }

    /// 아직 소비되지 않은 수신 이벤트 (진단용)
    pub async fn pending(&self) -> Vec<FrontendEvent> {
        let mut inbound = self.inbound.lock().await;
        inbound.pull_ready();
        inbound.set_aside.iter().cloned().collect()
    }

    /// 세션 종료. 이후 프레젠테이션 쪽 응답은 받지 않습니다.
    pub async fn close(&self) {
        let mut inbound = self.inbound.lock().await;
        inbound.rx.close();
        info!("sync session closed");
    }
}

impl PresentationLink {
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.events.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Envelope> {
        self.events.try_recv().ok()
    }

    pub fn send(&self, event: FrontendEvent) -> Result<(), SyncError> {
        self.responses.send(event).map_err(|_| SyncError::Closed)
    }

    pub fn ack(&self, event_id: Uuid) -> Result<(), SyncError> {
        self.send(FrontendEvent::Ack { event_id })
    }

    /// 요청 이외의 모든 이벤트에 Ack 하는 프레젠테이션 루프.
    /// GameOver 를 받거나 엔진 쪽이 닫히면 받은 이벤트를 모두 돌려줍니다.
    pub async fn auto_ack(mut self) -> Vec<GameEvent> {
        let mut seen = vec![];
        while let Some(envelope) = self.recv().await {
            if envelope.event.requires_ack() && self.ack(envelope.event_id).is_err() {
                break;
            }
            let over = matches!(envelope.event, GameEvent::GameOver { .. });
            seen.push(envelope.event);
            if over {
                break;
            }
        }
        seen
    }
}
