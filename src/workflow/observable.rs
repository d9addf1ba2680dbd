//! 可订阅的状态容器
//!
//! 持有唯一一份状态；每次成功修改后把新快照发布给订阅者。
//! 写操作需要 `&mut self`，因此同一时间只有一个写者。

use tokio::sync::watch;

pub struct Observable<T> {
    state: T,
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial.clone());
        Self { state: initial, tx }
    }

    pub fn get(&self) -> &T {
        &self.state
    }

    /// 修改状态并发布
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.state);
        self.publish();
        result
    }

    /// 修改成功才发布；失败时调用方保证状态未变
    pub fn try_update<R, E>(&mut self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let result = f(&mut self.state)?;
        self.publish();
        Ok(result)
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    fn publish(&self) {
        self.tx.send_replace(self.state.clone());
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
