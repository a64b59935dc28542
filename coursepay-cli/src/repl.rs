//! Line-oriented command loop driving the stores and the checkout flow.

use anyhow::Result;
use coursepay_core::checkout::countdown::CountdownTickReceiver;
use coursepay_core::checkout::{CheckoutError, CheckoutOrchestrator, CheckoutState};
use coursepay_core::events::ToastReceiver;
use coursepay_core::stores::{CartStore, NotificationStore};
use coursepay_sdk::client::{MethodDirectoryClient, OrderClient, PaymentClient};
use coursepay_sdk::objects::{CartItem, CourseId, MethodCode, PaymentStatus};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

const HELP: &str = "\
commands:
  add <id> <price> [title...]   add a course to the cart
  remove <id>                   remove a course from the cart
  cart                          show the cart
  clear                         empty the cart
  methods                       list payment methods
  checkout [promo]              create an order and start checkout
  select <CODE>                 pick a payment method (e.g. BANK, MOMO)
  back                          choose another method
  regen                         regenerate an expired QR code
  paid                          confirm you completed the payment
  poll                          keep waiting for confirmation
  notifications                 show the inbox
  read                          mark all notifications as read
  quit";

pub struct Repl {
    pub cart: CartStore,
    pub inbox: NotificationStore,
    pub orchestrator: CheckoutOrchestrator<OrderClient, PaymentClient>,
    pub methods: MethodDirectoryClient,
    pub toasts: ToastReceiver,
    ticks: Option<CountdownTickReceiver>,
}

impl Repl {
    pub fn new(
        cart: CartStore,
        inbox: NotificationStore,
        orchestrator: CheckoutOrchestrator<OrderClient, PaymentClient>,
        methods: MethodDirectoryClient,
        toasts: ToastReceiver,
    ) -> Self {
        Self {
            cart,
            inbox,
            orchestrator,
            methods,
            toasts,
            ticks: None,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("coursepay — type 'help' for commands");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some((&cmd, args)) = parts.split_first() else {
                continue;
            };

            if matches!(cmd, "quit" | "exit") {
                break;
            }
            if let Err(e) = self.dispatch(cmd, args).await {
                println!("error: {e}");
            }

            self.drain_countdown();
            self.drain_toasts();
        }
        Ok(())
    }

    async fn dispatch(&mut self, cmd: &str, args: &[&str]) -> Result<()> {
        match cmd {
            "help" => println!("{HELP}"),
            "add" => self.add(args)?,
            "remove" => {
                let id = args.first().ok_or_else(|| anyhow::anyhow!("usage: remove <id>"))?;
                if self.cart.remove_item(&CourseId::from(*id)).is_none() {
                    println!("not in cart: {id}");
                }
            }
            "cart" => self.show_cart(),
            "clear" => self.cart.clear(),
            "methods" => {
                for m in self.methods.list_payment_methods().await? {
                    println!("{:8} {:?}  {} — {}", m.id.as_str(), m.category, m.name, m.description);
                }
            }
            "checkout" => {
                let promo = args.first().map(|s| (*s).to_owned());
                let session = self.orchestrator.begin(&self.cart, promo).await?;
                println!(
                    "order {} — total due (incl. 10% tax): {}",
                    session.order_id(),
                    session.final_amount()
                );
                println!("pick a method with 'select <CODE>'");
            }
            "select" => self.select(args).await?,
            "back" => self.orchestrator.choose_another()?,
            "regen" => {
                self.orchestrator.regenerate_qr()?;
                self.ticks = self.orchestrator.countdown_ticks();
                self.show_instructions();
            }
            "paid" => self.settle(true).await?,
            "poll" => self.settle(false).await?,
            "notifications" => {
                for n in self.inbox.entries() {
                    let marker = if n.read { ' ' } else { '*' };
                    println!("{marker} [{:?}] {} — {}", n.variant, n.title, n.message);
                }
                println!("{} unread", self.inbox.unread_count());
            }
            "read" => self.inbox.mark_all_as_read(),
            other => println!("unknown command: {other} (try 'help')"),
        }
        Ok(())
    }

    fn add(&mut self, args: &[&str]) -> Result<()> {
        let (id, price) = match args {
            [id, price, ..] => (*id, *price),
            _ => anyhow::bail!("usage: add <id> <price> [title...]"),
        };
        let price: Decimal = price.parse()?;
        let title = if args.len() > 2 {
            args[2..].join(" ")
        } else {
            format!("Course {id}")
        };
        let thumbnail = Url::parse("https://cdn.coursepay.example.com/thumbs/default.png")?;
        self.cart.add_item(CartItem {
            id: CourseId::from(id),
            title,
            instructor: "(unknown)".to_owned(),
            thumbnail,
            price,
            discounted_price: None,
        });
        Ok(())
    }

    fn show_cart(&self) {
        for item in self.cart.items() {
            match item.discounted_price {
                Some(d) => println!("{:8} {} — {} (was {})", item.id, item.title, d, item.price),
                None => println!("{:8} {} — {}", item.id, item.title, item.price),
            }
        }
        println!("{} item(s), subtotal {}", self.cart.count(), self.cart.total());
    }

    async fn select(&mut self, args: &[&str]) -> Result<()> {
        let code = args.first().ok_or_else(|| anyhow::anyhow!("usage: select <CODE>"))?;
        let code = MethodCode::from(*code);
        let method = self
            .methods
            .list_payment_methods()
            .await?
            .iter()
            .find(|m| m.id == code)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown method: {code} (try 'methods')"))?;

        self.orchestrator.select_method(method).await?;
        self.ticks = self.orchestrator.countdown_ticks();
        self.show_instructions();
        println!("type 'paid' once you have completed the payment, or 'back' to switch");
        Ok(())
    }

    fn show_instructions(&self) {
        let Some(session) = self.orchestrator.session() else {
            return;
        };
        if let CheckoutState::AwaitingPayment { payload, .. } = session.state() {
            for line in payload.instructions() {
                println!("  {line}");
            }
        }
    }

    async fn settle(&mut self, confirm: bool) -> Result<()> {
        let result = if confirm {
            self.orchestrator
                .confirm_payment(&mut self.cart, &mut self.inbox)
                .await
        } else {
            self.orchestrator
                .poll_settlement(&mut self.cart, &mut self.inbox)
                .await
        };

        match result {
            Ok(PaymentStatus::Succeeded) => {
                println!("payment confirmed — enjoy your courses!");
                self.orchestrator.reset();
            }
            Ok(PaymentStatus::Failed) => {
                println!("payment was rejected; 'select' another method to retry");
                self.orchestrator.restart()?;
            }
            Ok(PaymentStatus::Pending) => {}
            Err(CheckoutError::ConfirmationPending) => {
                println!("still waiting for confirmation — 'poll' to keep checking");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Drain countdown ticks accumulated since the last command; on zero,
    /// flip the QR into its expired state.
    fn drain_countdown(&mut self) {
        let Some(rx) = self.ticks.as_mut() else { return };
        let mut expired = false;
        while let Ok(remaining) = rx.try_recv() {
            expired = remaining == 0;
        }
        if expired {
            self.ticks = None;
            if self.orchestrator.expire_qr().is_ok() {
                println!("the QR code expired — 'regen' to get a fresh one");
            }
        }
    }

    fn drain_toasts(&mut self) {
        while let Ok(toast) = self.toasts.try_recv() {
            println!("• [{:?}] {} — {}", toast.variant, toast.title, toast.message);
        }
    }
}
